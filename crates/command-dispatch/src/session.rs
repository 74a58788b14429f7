use crate::{Dispatcher, Outcome, SessionError, SessionMetrics};
use actuator_api::Actuator;
use command_codec::{decode, ACK};
use line_transport::{Transport, TransportError};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Per-session message counts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SessionReport {
    pub received: u64,
    pub dispatched: u64,
    pub ignored: u64,
    pub rejected: u64,
}

/// One connection's receive → decode → dispatch → acknowledge loop.
///
/// Strictly one command in flight: the next frame is not read until the
/// previous command's actions have finished and its acknowledgment is sent.
pub struct Session<'a> {
    id: Uuid,
    dispatcher: &'a Dispatcher,
    metrics: Option<&'a SessionMetrics>,
}

impl<'a> Session<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            id: Uuid::new_v4(),
            dispatcher,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: &'a SessionMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run until the peer closes the connection.
    ///
    /// Malformed frames and commands for other robots are dropped without a
    /// reply. Transport and actuator failures end the session with an error.
    pub fn run<T, A>(
        &self,
        transport: &mut T,
        actuator: &mut A,
    ) -> Result<SessionReport, SessionError>
    where
        T: Transport + ?Sized,
        A: Actuator + ?Sized,
    {
        let span = info_span!("session", id = %self.id, robot = self.dispatcher.local_name());
        let _enter = span.enter();
        if let Some(m) = self.metrics {
            m.sessions.inc();
        }
        info!("session started");

        let mut report = SessionReport::default();
        loop {
            let raw = match transport.recv() {
                Ok(raw) => raw,
                Err(TransportError::Closed) => {
                    info!(?report, "peer closed connection");
                    return Ok(report);
                }
                Err(TransportError::Timeout) => continue,
                Err(e) => return Err(e.into()),
            };
            report.received += 1;
            if let Some(m) = self.metrics {
                m.received.inc();
            }
            debug!(bytes = raw.len(), payload = %raw.text_lossy(), "frame received");

            let cmd = match decode(&raw.payload) {
                Ok(cmd) => cmd,
                Err(e) => {
                    warn!(error = %e, payload = %raw.text_lossy(), "discarding message");
                    report.rejected += 1;
                    if let Some(m) = self.metrics {
                        m.rejected.inc();
                    }
                    continue;
                }
            };

            match self.dispatcher.dispatch(&cmd, actuator)? {
                Outcome::Acknowledged => {
                    transport.send(ACK)?;
                    report.dispatched += 1;
                    if let Some(m) = self.metrics {
                        m.dispatched.inc();
                    }
                    info!(command = %cmd, "command done");
                }
                Outcome::Ignored => {
                    report.ignored += 1;
                    if let Some(m) = self.metrics {
                        m.ignored.inc();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DispatchError;
    use actuator_api::{ActionKind, ActuatorCall, MockActuator};
    use line_transport::MockTransport;
    use std::time::Duration;

    #[test]
    fn test_empty_receive_ends_session_cleanly() {
        let dispatcher = Dispatcher::new("Bot");
        let mut link = MockTransport::new([""]);
        let mut robot = MockActuator::new();
        let report = Session::new(&dispatcher).run(&mut link, &mut robot).unwrap();
        assert_eq!(report, SessionReport::default());
        assert!(link.sent().is_empty());
    }

    #[test]
    fn test_acknowledges_each_dispatched_command() {
        let dispatcher = Dispatcher::new("Bot");
        let mut link = MockTransport::new(["Bot;F;L;100;50", "Bot;0.0;0.5"]);
        let mut robot = MockActuator::new();
        let report = Session::new(&dispatcher).run(&mut link, &mut robot).unwrap();
        assert_eq!(report.dispatched, 2);
        assert_eq!(link.sent(), &[b"Done".to_vec(), b"Done".to_vec()]);
        assert_eq!(robot.calls().len(), 5);
    }

    #[test]
    fn test_bad_frames_are_dropped_and_loop_continues() {
        let dispatcher = Dispatcher::new("Bot");
        let mut link = MockTransport::new(vec![
            b"Bot;F;L".to_vec(),
            b"Bot;X;L;1;1".to_vec(),
            vec![0xff, 0x00],
            b"Other;F;L;10;0".to_vec(),
            b"Bot;F;L;10;0".to_vec(),
        ]);
        let mut robot = MockActuator::new();
        let report = Session::new(&dispatcher).run(&mut link, &mut robot).unwrap();
        assert_eq!(
            report,
            SessionReport {
                received: 5,
                dispatched: 1,
                ignored: 1,
                rejected: 3,
            }
        );
        // Only the final, well-formed and matching command is acknowledged
        assert_eq!(link.sent(), &[b"Done".to_vec()]);
        assert_eq!(
            robot.calls(),
            vec![ActuatorCall::DriveStraight {
                distance_mm: 10,
                speed_mmps: 150.0
            }]
        );
    }

    #[test]
    fn test_out_of_range_pose_still_acknowledged() {
        let dispatcher = Dispatcher::new("Bot");
        let mut link = MockTransport::new(["Bot;500;7"]);
        let mut robot = MockActuator::new();
        let report = Session::new(&dispatcher).run(&mut link, &mut robot).unwrap();
        assert_eq!(report.dispatched, 1);
        assert!(robot.calls().is_empty());
        assert_eq!(link.sent(), &[b"Done".to_vec()]);
    }

    #[test]
    fn test_actuator_timeout_ends_session_without_ack() {
        let dispatcher =
            Dispatcher::new("Bot").with_action_timeout(Some(Duration::from_millis(20)));
        let mut link = MockTransport::new(["Bot;F;L;10;0", "Bot;F;L;10;0"]);
        let mut robot = MockActuator::new().stall(ActionKind::DriveStraight);
        let err = Session::new(&dispatcher)
            .run(&mut link, &mut robot)
            .unwrap_err();
        assert!(matches!(err, SessionError::Dispatch(DispatchError::Actuator(_))));
        assert!(link.sent().is_empty());
        assert_eq!(link.remaining(), 1);
    }

    #[test]
    fn test_transport_error_ends_session_without_further_acks() {
        let dispatcher = Dispatcher::new("Bot");
        let mut link = MockTransport::scripted([
            Ok("Bot;F;L;10;0"),
            Err(TransportError::Io("connection lost".to_string())),
            Ok("Bot;F;L;20;0"),
        ]);
        let mut robot = MockActuator::new();
        let err = Session::new(&dispatcher)
            .run(&mut link, &mut robot)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transport(TransportError::Io(ref msg)) if msg == "connection lost"
        ));
        // Only the frame before the failure was acknowledged
        assert_eq!(link.sent(), &[b"Done".to_vec()]);
        assert_eq!(link.remaining(), 1);
        assert_eq!(robot.calls().len(), 1);
    }

    #[test]
    fn test_receive_timeout_keeps_waiting() {
        let dispatcher = Dispatcher::new("Bot");
        let mut link = MockTransport::scripted([
            Err(TransportError::Timeout),
            Err(TransportError::Timeout),
            Ok("Bot;F;L;10;0"),
        ]);
        let mut robot = MockActuator::new();
        let report = Session::new(&dispatcher).run(&mut link, &mut robot).unwrap();
        assert_eq!(report.received, 1);
        assert_eq!(report.dispatched, 1);
        assert_eq!(link.sent(), &[b"Done".to_vec()]);
    }

    #[test]
    fn test_metrics_follow_report() {
        let dispatcher = Dispatcher::new("Bot");
        let metrics = SessionMetrics::new().unwrap();
        let mut link = MockTransport::new(["Bot;F;L;0;0", "nope", "Else;1;1"]);
        let mut robot = MockActuator::new();
        let session = Session::new(&dispatcher).with_metrics(&metrics);
        session.run(&mut link, &mut robot).unwrap();
        assert_eq!(metrics.sessions.get(), 1);
        assert_eq!(metrics.received.get(), 3);
        assert_eq!(metrics.dispatched.get(), 1);
        assert_eq!(metrics.rejected.get(), 1);
        assert_eq!(metrics.ignored.get(), 1);
    }
}
