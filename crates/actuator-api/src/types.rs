use core::fmt;
use serde::{Deserialize, Serialize};

/// Lowest head angle the robot accepts, in degrees.
pub const MIN_HEAD_ANGLE_DEG: f64 = -25.0;
/// Highest head angle the robot accepts, in degrees.
pub const MAX_HEAD_ANGLE_DEG: f64 = 44.5;

pub const LIFT_MIN_RATIO: f64 = 0.0;
pub const LIFT_MAX_RATIO: f64 = 1.0;

/// Inclusive head angle bounds declared by an actuator backend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadAngleRange {
    pub min_degrees: f64,
    pub max_degrees: f64,
}

impl HeadAngleRange {
    pub fn contains(&self, degrees: f64) -> bool {
        self.min_degrees <= degrees && degrees <= self.max_degrees
    }
}

impl Default for HeadAngleRange {
    fn default() -> Self {
        Self {
            min_degrees: MIN_HEAD_ANGLE_DEG,
            max_degrees: MAX_HEAD_ANGLE_DEG,
        }
    }
}

impl fmt::Display for HeadAngleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.1}°, {:.1}°]", self.min_degrees, self.max_degrees)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    DriveStraight,
    TurnInPlace,
    SetHeadAngle,
    SetLiftHeight,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::DriveStraight => write!(f, "drive_straight"),
            ActionKind::TurnInPlace => write!(f, "turn_in_place"),
            ActionKind::SetHeadAngle => write!(f, "set_head_angle"),
            ActionKind::SetLiftHeight => write!(f, "set_lift_height"),
        }
    }
}

/// One issued primitive with its arguments, as recorded by backends that keep a log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActuatorCall {
    DriveStraight { distance_mm: i64, speed_mmps: f64 },
    TurnInPlace { degrees: f64 },
    SetHeadAngle { degrees: f64 },
    SetLiftHeight { ratio: f64 },
}

impl ActuatorCall {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActuatorCall::DriveStraight { .. } => ActionKind::DriveStraight,
            ActuatorCall::TurnInPlace { .. } => ActionKind::TurnInPlace,
            ActuatorCall::SetHeadAngle { .. } => ActionKind::SetHeadAngle,
            ActuatorCall::SetLiftHeight { .. } => ActionKind::SetLiftHeight,
        }
    }
}
