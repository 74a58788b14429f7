use crate::{RawMessage, Result, TransportError};
use std::time::Duration;

/// A minimal blocking, frame-per-receive connection.
pub trait Transport {
    /// Receive one frame. Peer shutdown is reported as `TransportError::Closed`.
    fn recv(&mut self) -> Result<RawMessage>;

    /// Send one frame in full.
    fn send(&mut self, payload: &[u8]) -> Result<()>;

    /// Bound subsequent receives; `None` blocks indefinitely.
    fn set_recv_timeout(&mut self, _timeout: Option<Duration>) -> Result<()> {
        let _ = _timeout;
        Err(TransportError::Unsupported("receive timeouts not supported"))
    }
}
