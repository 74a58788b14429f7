use crate::{
    ActionCompleter, ActionHandle, ActionKind, Actuator, ActuatorCall, ActuatorError,
    HeadAngleRange, Result,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Simulated duration of each primitive. Zero resolves the handle inline.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockTiming {
    pub drive: Duration,
    pub turn: Duration,
    pub head: Duration,
    pub lift: Duration,
}

impl MockTiming {
    /// All primitives take `d`.
    pub fn uniform(d: Duration) -> Self {
        Self {
            drive: d,
            turn: d,
            head: d,
            lift: d,
        }
    }

    fn for_kind(&self, kind: ActionKind) -> Duration {
        match kind {
            ActionKind::DriveStraight => self.drive,
            ActionKind::TurnInPlace => self.turn,
            ActionKind::SetHeadAngle => self.head,
            ActionKind::SetLiftHeight => self.lift,
        }
    }
}

/// In-process simulated robot. Records every call and tracks how many actions
/// were in flight at once.
pub struct MockActuator {
    timing: MockTiming,
    head_range: HeadAngleRange,
    calls: Arc<Mutex<Vec<ActuatorCall>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    stalled: HashSet<ActionKind>,
    rejected: HashMap<ActionKind, String>,
    // Held so stalled handles stay pending instead of resolving as abandoned
    parked: Vec<ActionCompleter>,
}

impl MockActuator {
    pub fn new() -> Self {
        Self::with_timing(MockTiming::default())
    }

    pub fn with_timing(timing: MockTiming) -> Self {
        Self {
            timing,
            head_range: HeadAngleRange::default(),
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            stalled: HashSet::new(),
            rejected: HashMap::new(),
            parked: Vec::new(),
        }
    }

    pub fn with_head_range(mut self, range: HeadAngleRange) -> Self {
        self.head_range = range;
        self
    }

    /// Actions of `kind` never complete; useful for exercising bounded waits.
    pub fn stall(mut self, kind: ActionKind) -> Self {
        self.stalled.insert(kind);
        self
    }

    /// Issuing an action of `kind` fails with [`ActuatorError::Rejected`].
    /// The call is still recorded.
    pub fn reject(mut self, kind: ActionKind, reason: impl Into<String>) -> Self {
        self.rejected.insert(kind, reason.into());
        self
    }

    /// Snapshot of the calls issued so far, in order.
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Highest number of simultaneously running actions observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Actions issued but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn issue(&mut self, call: ActuatorCall) -> Result<ActionHandle> {
        let kind = call.kind();
        debug!(?call, "mock actuator: issuing");
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);

        if let Some(reason) = self.rejected.get(&kind) {
            return Err(ActuatorError::Rejected {
                action: kind,
                reason: reason.clone(),
            });
        }

        let (handle, completer) = ActionHandle::pending(kind);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if self.stalled.contains(&kind) {
            self.parked.push(completer);
            return Ok(handle);
        }

        let duration = self.timing.for_kind(kind);
        if duration.is_zero() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            completer.complete(Ok(()));
            return Ok(handle);
        }

        let in_flight = Arc::clone(&self.in_flight);
        thread::spawn(move || {
            thread::sleep(duration);
            in_flight.fetch_sub(1, Ordering::SeqCst);
            completer.complete(Ok(()));
        });
        Ok(handle)
    }
}

impl Default for MockActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl Actuator for MockActuator {
    fn drive_straight(&mut self, distance_mm: i64, speed_mmps: f64) -> Result<ActionHandle> {
        self.issue(ActuatorCall::DriveStraight {
            distance_mm,
            speed_mmps,
        })
    }

    fn turn_in_place(&mut self, degrees: f64) -> Result<ActionHandle> {
        self.issue(ActuatorCall::TurnInPlace { degrees })
    }

    fn set_head_angle(&mut self, degrees: f64) -> Result<ActionHandle> {
        self.issue(ActuatorCall::SetHeadAngle { degrees })
    }

    fn set_lift_height(&mut self, ratio: f64) -> Result<ActionHandle> {
        self.issue(ActuatorCall::SetLiftHeight { ratio })
    }

    fn head_angle_range(&self) -> HeadAngleRange {
        self.head_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() -> anyhow::Result<()> {
        let mut robot = MockActuator::new();
        robot.turn_in_place(180.0)?.wait()?;
        robot.drive_straight(100, 150.0)?.wait()?;
        assert_eq!(
            robot.calls(),
            vec![
                ActuatorCall::TurnInPlace { degrees: 180.0 },
                ActuatorCall::DriveStraight {
                    distance_mm: 100,
                    speed_mmps: 150.0
                },
            ]
        );
        assert_eq!(robot.peak_in_flight(), 1);
        Ok(())
    }

    #[test]
    fn test_timed_actions_overlap_when_not_awaited() -> anyhow::Result<()> {
        let mut robot = MockActuator::with_timing(MockTiming::uniform(Duration::from_millis(50)));
        let head = robot.set_head_angle(10.0)?;
        let lift = robot.set_lift_height(0.5)?;
        head.wait()?;
        lift.wait()?;
        assert_eq!(robot.peak_in_flight(), 2);
        Ok(())
    }

    #[test]
    fn test_stalled_action_times_out() -> anyhow::Result<()> {
        let mut robot = MockActuator::new().stall(ActionKind::DriveStraight);
        let err = robot
            .drive_straight(10, 150.0)?
            .wait_timeout(Duration::from_millis(10))
            .unwrap_err();
        assert!(matches!(err, ActuatorError::Timeout { .. }));
        Ok(())
    }

    #[test]
    fn test_rejected_action_is_recorded_but_not_started() {
        let mut robot = MockActuator::new().reject(ActionKind::SetLiftHeight, "lift jammed");
        let err = robot.set_lift_height(0.5).unwrap_err();
        assert_eq!(
            err,
            ActuatorError::Rejected {
                action: ActionKind::SetLiftHeight,
                reason: "lift jammed".to_string(),
            }
        );
        assert_eq!(robot.calls(), vec![ActuatorCall::SetLiftHeight { ratio: 0.5 }]);
        assert_eq!(robot.in_flight(), 0);
        assert!(robot.set_head_angle(0.0).is_ok());
    }

    #[test]
    fn test_custom_head_range() {
        let range = HeadAngleRange {
            min_degrees: -10.0,
            max_degrees: 10.0,
        };
        let robot = MockActuator::new().with_head_range(range);
        assert!(!robot.head_angle_range().contains(20.0));
        assert!(robot.head_angle_range().contains(-10.0));
    }
}
