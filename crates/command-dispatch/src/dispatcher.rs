use crate::DispatchError;
use actuator_api::{ActionHandle, Actuator, LIFT_MAX_RATIO, LIFT_MIN_RATIO};
use command_codec::{Command, Drive, MotionCommand, PoseCommand};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_DRIVE_SPEED_MMPS: f64 = 150.0;

const REVERSE_DEGREES: f64 = 180.0;

/// What the caller should do after a dispatch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Command was addressed to us and ran; acknowledge it.
    Acknowledged,
    /// Command named another robot; stay silent.
    Ignored,
}

/// Maps commands onto actuator primitives for one named robot.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    local_name: String,
    drive_speed_mmps: f64,
    action_timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            drive_speed_mmps: DEFAULT_DRIVE_SPEED_MMPS,
            action_timeout: None,
        }
    }

    pub fn with_drive_speed(mut self, mmps: f64) -> Self {
        self.drive_speed_mmps = mmps;
        self
    }

    /// Bound every wait on an actuator action. `None` waits indefinitely.
    pub fn with_action_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Execute `cmd` if it targets this robot, blocking until every issued
    /// action has completed.
    pub fn dispatch<A: Actuator + ?Sized>(
        &self,
        cmd: &Command,
        actuator: &mut A,
    ) -> Result<Outcome, DispatchError> {
        if cmd.target() != self.local_name {
            debug!(
                target_name = cmd.target(),
                local_name = %self.local_name,
                "ignoring command addressed to another robot"
            );
            return Ok(Outcome::Ignored);
        }
        match cmd {
            Command::Motion(motion) => self.run_motion(motion, actuator)?,
            Command::Pose(pose) => self.run_pose(pose, actuator)?,
        }
        Ok(Outcome::Acknowledged)
    }

    fn run_motion<A: Actuator + ?Sized>(
        &self,
        cmd: &MotionCommand,
        actuator: &mut A,
    ) -> Result<(), DispatchError> {
        if cmd.forward_distance != 0 {
            if cmd.forward_or_back == Drive::Backward {
                self.await_action(actuator.turn_in_place(REVERSE_DEGREES)?)?;
            }
            let drive = actuator.drive_straight(cmd.forward_distance, self.drive_speed_mmps)?;
            self.await_action(drive)?;
        }

        if cmd.turn_distance != 0 {
            self.await_action(actuator.turn_in_place(cmd.turn_dir.degrees())?)?;
            let drive = actuator.drive_straight(cmd.turn_distance, self.drive_speed_mmps)?;
            self.await_action(drive)?;
        }
        Ok(())
    }

    fn run_pose<A: Actuator + ?Sized>(
        &self,
        cmd: &PoseCommand,
        actuator: &mut A,
    ) -> Result<(), DispatchError> {
        let head_range = actuator.head_angle_range();
        let head = if head_range.contains(cmd.head_angle) {
            Some(actuator.set_head_angle(cmd.head_angle)?)
        } else {
            info!(
                head_angle = cmd.head_angle,
                "head angle outside {head_range}, skipping"
            );
            None
        };

        // Issued before waiting on the head so both move together
        let lift = if (LIFT_MIN_RATIO..=LIFT_MAX_RATIO).contains(&cmd.lift_height) {
            match actuator.set_lift_height(cmd.lift_height) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    // Let the head settle before reporting
                    if let Some(head) = head {
                        let _ = head.wait_for(self.action_timeout);
                    }
                    return Err(e.into());
                }
            }
        } else {
            info!(
                lift_height = cmd.lift_height,
                "lift height outside [{LIFT_MIN_RATIO}, {LIFT_MAX_RATIO}], skipping"
            );
            None
        };

        let head_result = head.map(|h| self.await_action(h)).transpose();
        let lift_result = lift.map(|h| self.await_action(h)).transpose();
        head_result?;
        lift_result?;
        Ok(())
    }

    fn await_action(&self, handle: ActionHandle) -> Result<(), DispatchError> {
        let kind = handle.kind();
        handle.wait_for(self.action_timeout)?;
        debug!(action = %kind, "action completed");
        Ok(())
    }
}
