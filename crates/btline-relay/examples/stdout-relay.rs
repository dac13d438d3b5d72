//! Drive the relay loop against stdout instead of a Bluetooth stream.
//!
//! Type lines and watch them echo; type `quit` to stop. Useful for
//! exercising the loop without any hardware:
//!
//! ```text
//! cargo run --example stdout-relay
//! ```

use std::io;

use btline_relay::{Relay, RelayConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayConfig {
        append_newline: true,
        ..RelayConfig::default()
    };

    let stdout = io::stdout();
    let mut relay = Relay::with_config(stdout.lock(), config);

    let stdin = io::stdin();
    let summary = relay.run(stdin.lock())?;

    eprintln!(
        "relayed {} lines ({} bytes), exit: {}",
        summary.lines_sent,
        summary.bytes_sent,
        summary.exit.as_str()
    );
    Ok(())
}
