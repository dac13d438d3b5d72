//! Bluetooth RFCOMM line relay.
//!
//! btline opens a serial-style connection to a remote Bluetooth device
//! and forwards console input lines to it until the sentinel line
//! `quit`.
//!
//! # Crate Structure
//!
//! - [`transport`] — device addresses, endpoints, and the connected
//!   RFCOMM stream
//! - [`relay`] — the sequential line relay loop

/// Re-export transport types.
pub mod transport {
    pub use btline_transport::*;
}

/// Re-export relay types.
pub mod relay {
    pub use btline_relay::*;
}
