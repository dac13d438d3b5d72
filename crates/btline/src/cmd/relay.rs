#[cfg(target_os = "linux")]
use std::io;

#[cfg(target_os = "linux")]
use btline_relay::{Relay, RelayConfig};
#[cfg(target_os = "linux")]
use btline_transport::RfcommStream;
#[cfg(target_os = "linux")]
use tracing::info;

use crate::cmd::RelayArgs;
use crate::exit::CliResult;
#[cfg(target_os = "linux")]
use crate::exit::{relay_error, transport_error, SUCCESS};
use crate::output::OutputFormat;

#[cfg(target_os = "linux")]
pub fn run(args: RelayArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoint = crate::cmd::parse_endpoint(&args.address, args.channel)?;
    let send_timeout = args
        .send_timeout
        .as_deref()
        .map(crate::cmd::parse_duration)
        .transpose()?;

    info!(%endpoint, "connecting");
    let stream = RfcommStream::connect(&endpoint)
        .map_err(|err| transport_error("connect failed", err))?;
    info!(%endpoint, sentinel = btline_relay::SENTINEL, "connected, relaying console input");

    let config = RelayConfig {
        append_newline: args.append_newline,
        send_timeout,
        ..RelayConfig::default()
    };
    let mut relay = Relay::with_config_rfcomm(stream, config)
        .map_err(|err| transport_error("socket setup failed", err))?;

    let stdin = io::stdin();
    let summary = relay
        .run(stdin.lock())
        .map_err(|err| relay_error("relay failed", err))?;

    crate::output::print_summary(&summary, &endpoint, format);
    Ok(SUCCESS)
}

#[cfg(not(target_os = "linux"))]
pub fn run(args: RelayArgs, _format: OutputFormat) -> CliResult<i32> {
    let _ = args;
    Err(crate::exit::CliError::new(
        crate::exit::TRANSPORT_ERROR,
        "rfcomm transport unavailable: btline requires linux (bluez)",
    ))
}
