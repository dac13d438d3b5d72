//! Bluetooth RFCOMM transport.
//!
//! Provides the pieces needed to open a connection-oriented serial link
//! to a remote Bluetooth device:
//! - [`BtAddr`] — a 6-octet device address, parsed from colon-separated hex
//! - [`Endpoint`] — an address plus an RFCOMM channel number
//! - [`RfcommStream`] — a connected stream implementing `Read + Write`
//!
//! This is the lowest layer of btline. The relay loop builds on top of
//! the [`RfcommStream`] type provided here. RFCOMM sockets are a BlueZ
//! (Linux kernel) facility, so the stream type is only available on Linux.

pub mod addr;
pub mod endpoint;
pub mod error;

#[cfg(target_os = "linux")]
mod sys;

#[cfg(target_os = "linux")]
pub mod rfcomm;

pub use addr::BtAddr;
pub use endpoint::Endpoint;
pub use error::{Result, TransportError};

#[cfg(target_os = "linux")]
pub use rfcomm::{rfcomm_available, RfcommStream};
