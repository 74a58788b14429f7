//! actuator-api: the motion surface the command dispatcher drives
//!
//! An [`Actuator`] accepts one physical primitive per call (drive, turn, head,
//! lift) and hands back an [`ActionHandle`] that resolves when the robot
//! reports the motion finished. The default build enables a `mock` backend that
//! simulates motion on background threads so the protocol can run without
//! hardware.

mod types;
pub use types::{
    ActionKind, ActuatorCall, HeadAngleRange, LIFT_MAX_RATIO, LIFT_MIN_RATIO, MAX_HEAD_ANGLE_DEG,
    MIN_HEAD_ANGLE_DEG,
};

mod error;
pub use error::{ActuatorError, Result};

mod handle;
pub use handle::{ActionCompleter, ActionHandle};

mod traits;
pub use traits::Actuator;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::{MockActuator, MockTiming};
