//! Controller side of the link: accepts a single robot and forwards stdin lines.

use anyhow::{bail, Context, Result};
use command_codec::ACK;
use line_transport::{TcpTransport, Transport, TransportError};
use std::io::{self, BufRead, Write};
use std::net::TcpListener;
use std::time::Duration;
use tracing::{info, warn};

pub fn serve(bind: &str, ack_timeout: Duration, raw: bool) -> Result<()> {
    let listener = TcpListener::bind(bind).with_context(|| format!("binding {bind}"))?;
    info!(%bind, "waiting for robot to connect");
    let mut link = TcpTransport::accept(&listener)?;
    link.set_recv_timeout(Some(ack_timeout))?;
    println!("robot connected from {}", link.peer_addr());

    let stdin = io::stdin();
    let stdout = io::stdout();
    forward_lines(stdin.lock(), &mut link, raw, &mut stdout.lock())
}

/// Send each non-empty input line as one frame and wait for its
/// acknowledgment before reading the next line.
///
/// A missing acknowledgment ends the link with an error: the robot may still
/// be executing, and its late `Done` would otherwise be read as the reply to
/// the following frame.
pub fn forward_lines<R, T, W>(input: R, link: &mut T, raw: bool, out: &mut W) -> Result<()>
where
    R: BufRead,
    T: Transport + ?Sized,
    W: Write,
{
    for line in input.lines() {
        let line = line.context("reading input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let frame = if raw {
            line.to_string()
        } else {
            match command_codec::parse(line).and_then(|cmd| cmd.encode()) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(%line, "not sending invalid frame");
                    writeln!(out, "rejected locally: {e}")?;
                    continue;
                }
            }
        };

        link.send(frame.as_bytes())?;
        match link.recv() {
            Ok(reply) if reply.payload == ACK => writeln!(out, "done")?,
            Ok(reply) => writeln!(out, "unexpected reply: {}", reply.text_lossy())?,
            Err(TransportError::Timeout) => {
                writeln!(out, "no acknowledgment, robot state unknown; hanging up")?;
                bail!("no acknowledgment for {frame:?}");
            }
            Err(TransportError::Closed) => {
                info!("robot disconnected");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
    info!("input closed, hanging up");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actuator_api::{ActuatorCall, MockActuator, MockTiming};
    use command_dispatch::{Dispatcher, Session};
    use line_transport::MockTransport;
    use std::io::Cursor;
    use std::thread;

    #[test]
    fn test_forwards_valid_lines_and_reports_acks() -> Result<()> {
        let mut link = MockTransport::new(["Done"]);
        let mut out = Vec::new();
        let input = Cursor::new("Bot;F;L\n\nBot;F;L;10;0\n");
        forward_lines(input, &mut link, false, &mut out)?;
        assert_eq!(link.sent(), &[b"Bot;F;L;10;0".to_vec()]);
        let out = String::from_utf8(out)?;
        assert!(out.contains("rejected locally"));
        assert!(out.ends_with("done\n"));
        Ok(())
    }

    #[test]
    fn test_raw_mode_sends_line_unchecked() -> Result<()> {
        let mut link = MockTransport::new(Vec::<Vec<u8>>::new());
        let mut out = Vec::new();
        forward_lines(Cursor::new("Bot;F;L\n"), &mut link, true, &mut out)?;
        assert_eq!(link.sent(), &[b"Bot;F;L".to_vec()]);
        Ok(())
    }

    #[test]
    fn test_missing_ack_stops_forwarding() {
        let mut link = MockTransport::scripted([Err(TransportError::Timeout), Ok("Done")]);
        let mut out = Vec::new();
        let input = Cursor::new("Bot;F;L;10;0\nOther;F;L;10;0\n");
        assert!(forward_lines(input, &mut link, false, &mut out).is_err());
        // The late Done is never consumed as the reply to the second frame
        assert_eq!(link.sent(), &[b"Bot;F;L;10;0".to_vec()]);
        assert_eq!(link.remaining(), 1);
    }

    #[test]
    fn test_slow_robot_does_not_ack_the_next_frame() -> Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?.to_string();

        let robot = thread::spawn(move || -> Result<Vec<ActuatorCall>> {
            let mut link = TcpTransport::connect(&addr, Some(Duration::from_secs(5)))?;
            let dispatcher = Dispatcher::new("Bot");
            let mut actuator =
                MockActuator::with_timing(MockTiming::uniform(Duration::from_millis(250)));
            // Writing the late ack may fail once the controller hangs up
            let _ = Session::new(&dispatcher).run(&mut link, &mut actuator);
            Ok(actuator.calls())
        });

        let mut link = TcpTransport::accept(&listener)?;
        link.set_recv_timeout(Some(Duration::from_millis(100)))?;
        let mut out = Vec::new();
        let input = Cursor::new("Bot;F;L;10;0\nOther;F;L;10;0\n");
        let result = forward_lines(input, &mut link, false, &mut out);
        drop(link);

        assert!(result.is_err());
        assert!(!String::from_utf8(out)?.contains("done"));
        let calls = robot
            .join()
            .map_err(|_| anyhow::anyhow!("robot thread panicked"))??;
        assert_eq!(
            calls,
            vec![ActuatorCall::DriveStraight {
                distance_mm: 10,
                speed_mmps: 150.0
            }]
        );
        Ok(())
    }
}
