use crate::{ActionKind, ActuatorError, Result};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::time::Duration;

/// Completion handle for one issued actuator action.
///
/// Backends create a pending handle together with an [`ActionCompleter`] and
/// resolve it from whatever thread observes the motion finishing.
#[derive(Debug)]
pub struct ActionHandle {
    kind: ActionKind,
    rx: Receiver<Result<()>>,
}

/// Resolving half of an [`ActionHandle`].
#[derive(Debug)]
pub struct ActionCompleter {
    tx: SyncSender<Result<()>>,
}

impl ActionHandle {
    pub fn pending(kind: ActionKind) -> (Self, ActionCompleter) {
        // Capacity 1 so completing never blocks, even if nobody waits
        let (tx, rx) = mpsc::sync_channel(1);
        (Self { kind, rx }, ActionCompleter { tx })
    }

    /// A handle that is already resolved successfully.
    pub fn completed(kind: ActionKind) -> Self {
        let (handle, completer) = Self::pending(kind);
        completer.complete(Ok(()));
        handle
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Block until the action finishes.
    pub fn wait(self) -> Result<()> {
        match self.rx.recv() {
            Ok(result) => result,
            Err(_) => Err(ActuatorError::Abandoned(self.kind)),
        }
    }

    /// Block until the action finishes or `timeout` elapses.
    pub fn wait_timeout(self, timeout: Duration) -> Result<()> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ActuatorError::Timeout {
                action: self.kind,
                after: timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(ActuatorError::Abandoned(self.kind)),
        }
    }

    /// [`wait`](Self::wait) when `timeout` is `None`, otherwise a bounded wait.
    pub fn wait_for(self, timeout: Option<Duration>) -> Result<()> {
        match timeout {
            Some(limit) => self.wait_timeout(limit),
            None => self.wait(),
        }
    }
}

impl ActionCompleter {
    pub fn complete(self, result: Result<()>) {
        // The waiter may have given up already; nothing to report then.
        let _ = self.tx.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_completed_handle_resolves_immediately() {
        let handle = ActionHandle::completed(ActionKind::TurnInPlace);
        assert_eq!(handle.kind(), ActionKind::TurnInPlace);
        assert!(handle.wait().is_ok());
    }

    #[test]
    fn test_completion_from_another_thread() {
        let (handle, completer) = ActionHandle::pending(ActionKind::DriveStraight);
        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            completer.complete(Ok(()));
        });
        assert!(handle.wait_timeout(Duration::from_secs(5)).is_ok());
        worker.join().unwrap();
    }

    #[test]
    fn test_backend_failure_is_propagated() {
        let (handle, completer) = ActionHandle::pending(ActionKind::SetLiftHeight);
        completer.complete(Err(ActuatorError::Backend("stalled motor".into())));
        assert_eq!(
            handle.wait(),
            Err(ActuatorError::Backend("stalled motor".into()))
        );
    }

    #[test]
    fn test_wait_timeout_expires() {
        let (handle, _completer) = ActionHandle::pending(ActionKind::SetHeadAngle);
        let err = handle.wait_timeout(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(
            err,
            ActuatorError::Timeout {
                action: ActionKind::SetHeadAngle,
                ..
            }
        ));
    }

    #[test]
    fn test_dropped_completer_is_abandoned() {
        let (handle, completer) = ActionHandle::pending(ActionKind::DriveStraight);
        drop(completer);
        assert_eq!(
            handle.wait_for(None),
            Err(ActuatorError::Abandoned(ActionKind::DriveStraight))
        );
    }
}
