use actuator_api::ActuatorError;
use line_transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("actuator failure: {0}")]
    Actuator(#[from] ActuatorError),
}

/// Conditions that end a session early. Orderly peer shutdown is not one of them.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("dispatch: {0}")]
    Dispatch(#[from] DispatchError),
}
