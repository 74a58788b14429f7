use crate::{Command, CodecError, Drive, Field, MotionCommand, PoseCommand, Result, Turn};

pub const FIELD_SEPARATOR: char = ';';

/// Parse one text frame into a [`Command`].
///
/// Fields are validated left to right and the first violation is reported.
/// Numeric fields may carry surrounding whitespace; target and direction
/// fields must match exactly.
pub fn parse(raw: &str) -> Result<Command> {
    let parts: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    match parts.as_slice() {
        [target, dir1, dir2, x, y] => {
            parse_motion(target, dir1, dir2, x, y).map(Command::Motion)
        }
        [target, head, tractor] => parse_pose(target, head, tractor).map(Command::Pose),
        _ => Err(CodecError::MalformedMessage {
            fields: parts.len(),
        }),
    }
}

/// Parse a raw transport payload. Non-UTF-8 input is rejected before splitting.
pub fn decode(payload: &[u8]) -> Result<Command> {
    let text = std::str::from_utf8(payload).map_err(|_| CodecError::NotUtf8)?;
    parse(text)
}

fn parse_motion(
    target: &str,
    dir1: &str,
    dir2: &str,
    x: &str,
    y: &str,
) -> Result<MotionCommand> {
    let forward_or_back =
        Drive::from_code(dir1).ok_or_else(|| CodecError::invalid(Field::Dir1, dir1))?;
    let turn_dir =
        Turn::from_code(dir2).ok_or_else(|| CodecError::invalid(Field::Dir2, dir2))?;
    let forward_distance = parse_int(Field::X, x)?;
    let turn_distance = parse_int(Field::Y, y)?;
    Ok(MotionCommand {
        target: target.to_string(),
        forward_or_back,
        turn_dir,
        forward_distance,
        turn_distance,
    })
}

fn parse_pose(target: &str, head: &str, tractor: &str) -> Result<PoseCommand> {
    let head_angle = parse_float(Field::HeadValue, head)?;
    let lift_height = parse_float(Field::TractorValue, tractor)?;
    Ok(PoseCommand {
        target: target.to_string(),
        head_angle,
        lift_height,
    })
}

fn parse_int(field: Field, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| CodecError::invalid(field, value))
}

fn parse_float(field: Field, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CodecError::invalid(field, value))
}
