//! The btline relay loop.
//!
//! Reads lines from an input stream, stops on the sentinel line, and
//! writes each other line's UTF-8 bytes to a sink. The loop is generic
//! over any `Write` sink, so it can be driven against in-memory buffers
//! in tests and against an RFCOMM stream in production.
//!
//! The core has no console-output side effects; connection and transfer
//! state is reported through `tracing` events only.

pub mod error;
pub mod relay;

pub use error::{RelayError, Result};
pub use relay::{ExitReason, Relay, RelayConfig, RelaySummary, SENTINEL};
