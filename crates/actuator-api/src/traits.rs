use crate::{ActionHandle, HeadAngleRange, Result};

/// Blocking-friendly motion interface over a single robot.
///
/// Every call starts the motion and returns immediately; callers decide when to
/// wait on the returned handle. Issuing a second call before waiting on the
/// first asks the backend to run both motions concurrently.
pub trait Actuator {
    /// Drive straight for `distance_mm` (negative reverses) at `speed_mmps`.
    fn drive_straight(&mut self, distance_mm: i64, speed_mmps: f64) -> Result<ActionHandle>;

    /// Rotate in place, counter-clockwise positive.
    fn turn_in_place(&mut self, degrees: f64) -> Result<ActionHandle>;

    /// Move the head to an absolute angle.
    fn set_head_angle(&mut self, degrees: f64) -> Result<ActionHandle>;

    /// Move the lift to `ratio` of its travel, 0.0 fully down and 1.0 fully up.
    fn set_lift_height(&mut self, ratio: f64) -> Result<ActionHandle>;

    /// Head angle bounds of this robot.
    fn head_angle_range(&self) -> HeadAngleRange {
        HeadAngleRange::default()
    }
}
