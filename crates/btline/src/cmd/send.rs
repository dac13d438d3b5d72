use std::fs;
#[cfg(target_os = "linux")]
use std::io::Write;

use crate::cmd::SendArgs;
use crate::exit::CliResult;
#[cfg(target_os = "linux")]
use crate::exit::{io_error, transport_error, SUCCESS};
use crate::output::OutputFormat;

#[cfg(target_os = "linux")]
pub fn run(args: SendArgs, _format: OutputFormat) -> CliResult<i32> {
    let endpoint = crate::cmd::parse_endpoint(&args.address, args.channel)?;
    let send_timeout = args
        .send_timeout
        .as_deref()
        .map(crate::cmd::parse_duration)
        .transpose()?;

    let mut payload = resolve_payload(&args)?;
    if args.append_newline {
        payload.push(b'\n');
    }

    let mut stream = btline_transport::RfcommStream::connect(&endpoint)
        .map_err(|err| transport_error("connect failed", err))?;
    stream
        .set_send_timeout(send_timeout)
        .map_err(|err| transport_error("socket setup failed", err))?;

    stream
        .write_all(&payload)
        .map_err(|err| io_error("send failed", err))?;

    tracing::info!(%endpoint, bytes = payload.len(), "payload transmitted");
    Ok(SUCCESS)
}

#[cfg(not(target_os = "linux"))]
pub fn run(args: SendArgs, _format: OutputFormat) -> CliResult<i32> {
    let _ = args;
    Err(crate::exit::CliError::new(
        crate::exit::TRANSPORT_ERROR,
        "rfcomm transport unavailable: btline requires linux (bluez)",
    ))
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        });
    }
    Ok(Vec::new())
}
