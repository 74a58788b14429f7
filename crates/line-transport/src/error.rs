use thiserror::Error;

pub type Result<T, E = TransportError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {addr}: {reason}")]
    ConnectFailed { addr: String, reason: String },
    #[error("connection closed by peer")]
    Closed,
    #[error("timeout")]
    Timeout,
    #[error("I/O error: {0}")]
    Io(String),
    #[error("operation not supported on this backend: {0}")]
    Unsupported(&'static str),
}
