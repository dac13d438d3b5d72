/// Errors that can occur in the relay loop.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Reading a line from the input stream failed.
    #[error("input error: {0}")]
    Input(std::io::Error),

    /// Writing to the sink failed.
    #[error("transmission error: {0}")]
    Transmission(std::io::Error),

    /// The sink accepted a zero-length write; the connection is gone.
    #[error("connection closed by peer")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, RelayError>;
