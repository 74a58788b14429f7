use crate::ActionKind;
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = ActuatorError> = core::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActuatorError {
    #[error("{action} did not complete within {after:?}")]
    Timeout { action: ActionKind, after: Duration },
    #[error("{0} was dropped by the backend before completing")]
    Abandoned(ActionKind),
    #[error("{action} rejected: {reason}")]
    Rejected { action: ActionKind, reason: String },
    #[error("actuator backend error: {0}")]
    Backend(String),
}
