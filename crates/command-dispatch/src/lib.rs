//! command-dispatch: runs robot link commands against an actuator
//!
//! A [`Session`] owns the receive → decode → dispatch → acknowledge loop for a
//! single connection. The [`Dispatcher`] holds the per-command sequencing
//! rules and never touches the transport itself.

mod error;
pub use error::{DispatchError, SessionError};

mod dispatcher;
pub use dispatcher::{Dispatcher, Outcome, DEFAULT_DRIVE_SPEED_MMPS};

mod session;
pub use session::{Session, SessionReport};

mod config;
pub use config::{load_config, LinkConfig};

mod metrics;
pub use metrics::SessionMetrics;
