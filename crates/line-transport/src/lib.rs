//! line-transport: point-to-point byte-stream transport
//!
//! One [`Transport::recv`] call yields one protocol frame. A zero-length read
//! means the peer closed the connection and surfaces as
//! [`TransportError::Closed`]. The default build enables a `mock` backend for
//! scripted tests alongside the TCP backend.

mod types;
pub use types::{RawMessage, Timestamp};

mod error;
pub use error::{Result, TransportError};

mod traits;
pub use traits::Transport;

mod tcp;
pub use tcp::{TcpTransport, RECV_BUFFER_LEN};

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::MockTransport;
