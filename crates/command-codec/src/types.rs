use core::fmt;
use core::str::FromStr;
use serde::Serialize;

use crate::{CodecError, FIELD_SEPARATOR};

/// Direction of the straight-line phase of a motion command.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Drive {
    Forward,
    Backward,
}

impl Drive {
    pub fn code(self) -> &'static str {
        match self {
            Drive::Forward => "F",
            Drive::Backward => "B",
        }
    }

    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            "F" => Some(Drive::Forward),
            "B" => Some(Drive::Backward),
            _ => None,
        }
    }
}

/// Direction of the turning phase of a motion command.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    pub fn code(self) -> &'static str {
        match self {
            Turn::Left => "L",
            Turn::Right => "R",
        }
    }

    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(Turn::Left),
            "R" => Some(Turn::Right),
            _ => None,
        }
    }

    /// In-place rotation applied before the turn leg, counter-clockwise positive.
    pub fn degrees(self) -> f64 {
        match self {
            Turn::Left => 90.0,
            Turn::Right => -90.0,
        }
    }
}

/// Five-field form: drive then turn-and-drive. Distances are millimeters.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MotionCommand {
    pub target: String,
    pub forward_or_back: Drive,
    pub turn_dir: Turn,
    pub forward_distance: i64,
    pub turn_distance: i64,
}

/// Three-field form: head angle in degrees and lift height as a ratio.
///
/// Values are not range checked here; see the dispatcher.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoseCommand {
    pub target: String,
    pub head_angle: f64,
    pub lift_height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Motion(MotionCommand),
    Pose(PoseCommand),
}

impl Command {
    pub fn target(&self) -> &str {
        match self {
            Command::Motion(m) => &m.target,
            Command::Pose(p) => &p.target,
        }
    }

    /// Render the wire frame, refusing targets that would split into extra
    /// fields on the receiving side.
    pub fn encode(&self) -> Result<String, CodecError> {
        if self.target().contains(FIELD_SEPARATOR) {
            return Err(CodecError::InvalidTarget {
                target: self.target().to_string(),
            });
        }
        Ok(self.to_string())
    }
}

impl From<MotionCommand> for Command {
    fn from(cmd: MotionCommand) -> Self {
        Command::Motion(cmd)
    }
}

impl From<PoseCommand> for Command {
    fn from(cmd: PoseCommand) -> Self {
        Command::Pose(cmd)
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.target,
            self.forward_or_back.code(),
            self.turn_dir.code(),
            self.forward_distance,
            self.turn_distance
        )
    }
}

impl fmt::Display for PoseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        // `{:?}` keeps a decimal point so the frame always reads back as floats
        write!(
            f,
            "{}{sep}{:?}{sep}{:?}",
            self.target, self.head_angle, self.lift_height
        )
    }
}

/// Writes the wire form verbatim. The target is not escaped, so use
/// [`Command::encode`] for commands not produced by [`crate::parse`].
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Motion(m) => m.fmt(f),
            Command::Pose(p) => p.fmt(f),
        }
    }
}

impl FromStr for Command {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}
