//! command-codec: typed commands for the robot link protocol
//!
//! Frames are newline-free ASCII text with semicolon-separated fields:
//!
//! - motion: `<target>;<F|B>;<L|R>;<int>;<int>`
//! - pose: `<target>;<float>;<float>`
//!
//! The field count decides the variant once, here at the protocol boundary, so
//! downstream code only ever sees a [`Command`].

mod types;
pub use types::{Command, Drive, MotionCommand, PoseCommand, Turn};

mod error;
pub use error::{CodecError, Field, Result};

mod codec;
pub use codec::{decode, parse, FIELD_SEPARATOR};

/// Literal written back after every dispatched command.
pub const ACK: &[u8] = b"Done";
