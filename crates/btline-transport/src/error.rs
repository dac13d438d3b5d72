use crate::endpoint::Endpoint;

/// Errors that can occur in RFCOMM transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The system cannot create Bluetooth sockets at all (no kernel
    /// Bluetooth support, or the address family is masked off).
    #[error("bluetooth sockets unsupported on this system: {0}")]
    Unsupported(std::io::Error),

    /// Failed to create the RFCOMM socket.
    #[error("failed to create rfcomm socket: {0}")]
    Socket(std::io::Error),

    /// Failed to connect to the specified endpoint.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: Endpoint,
        source: std::io::Error,
    },

    /// The device address string could not be parsed.
    #[error("invalid bluetooth address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
