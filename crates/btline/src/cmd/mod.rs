use std::path::PathBuf;
use std::time::Duration;

use btline_transport::Endpoint;
use clap::{Args, Subcommand};

use crate::exit::{transport_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod doctor;
pub mod envinfo;
pub mod relay;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Relay console lines to a remote endpoint until "quit".
    Relay(RelayArgs),
    /// Send a single payload and exit.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Relay(args) => relay::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct RelayArgs {
    /// Remote device address (colon-separated hex octets).
    #[arg(value_name = "ADDRESS", env = "BTLINE_ADDR")]
    pub address: String,
    /// RFCOMM channel on the remote device.
    #[arg(long, short = 'c', default_value_t = 1, env = "BTLINE_CHANNEL")]
    pub channel: u8,
    /// Append a newline to every transmitted line.
    #[arg(long)]
    pub append_newline: bool,
    /// Fail a transmission that stalls longer than this (e.g. 5s, 500ms).
    #[arg(long, value_name = "DURATION")]
    pub send_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Remote device address (colon-separated hex octets).
    #[arg(value_name = "ADDRESS", env = "BTLINE_ADDR")]
    pub address: String,
    /// RFCOMM channel on the remote device.
    #[arg(long, short = 'c', default_value_t = 1, env = "BTLINE_CHANNEL")]
    pub channel: u8,
    /// Raw string payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Append a newline to the transmitted payload.
    #[arg(long)]
    pub append_newline: bool,
    /// Fail a transmission that stalls longer than this (e.g. 5s, 500ms).
    #[arg(long, value_name = "DURATION")]
    pub send_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}

/// Resolve the address/channel pair into a connectable endpoint.
pub(crate) fn parse_endpoint(address: &str, channel: u8) -> CliResult<Endpoint> {
    let addr = address
        .parse()
        .map_err(|err| transport_error("invalid endpoint", err))?;
    Ok(Endpoint::new(addr, channel))
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_endpoint_accepts_sample_literals() {
        let endpoint = parse_endpoint("34:98:7A:6A:A9:AC", 1).expect("sample should parse");
        assert_eq!(endpoint.to_string(), "34:98:7A:6A:A9:AC/1");

        let endpoint = parse_endpoint("E4:65:B8:6F:4B:B6", 0).expect("sample should parse");
        assert_eq!(endpoint.to_string(), "E4:65:B8:6F:4B:B6/0");
    }

    #[test]
    fn parse_endpoint_maps_bad_address_to_usage() {
        let err = parse_endpoint("definitely-not-an-address", 1).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
