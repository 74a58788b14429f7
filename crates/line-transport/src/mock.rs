use crate::{RawMessage, Result, Transport, TransportError};
use std::collections::VecDeque;
use std::time::Duration;

/// Scripted in-process transport. Each queued entry is returned by one
/// `recv`; an empty payload or an exhausted script reads as peer shutdown.
pub struct MockTransport {
    inbound: VecDeque<Result<Vec<u8>>>,
    sent: Vec<Vec<u8>>,
}

impl MockTransport {
    pub fn new<I, P>(frames: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Vec<u8>>,
    {
        Self::scripted(frames.into_iter().map(Ok))
    }

    /// Like [`MockTransport::new`], but entries may also be receive errors,
    /// returned in order from `recv`.
    pub fn scripted<I, P>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<P>>,
        P: Into<Vec<u8>>,
    {
        Self {
            inbound: script.into_iter().map(|r| r.map(Into::into)).collect(),
            sent: Vec::new(),
        }
    }

    /// Everything written through `send`, one entry per call.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    pub fn remaining(&self) -> usize {
        self.inbound.len()
    }
}

impl Transport for MockTransport {
    fn recv(&mut self) -> Result<RawMessage> {
        match self.inbound.pop_front() {
            Some(Ok(frame)) if !frame.is_empty() => Ok(RawMessage::new(frame)),
            Some(Err(e)) => Err(e),
            _ => Err(TransportError::Closed),
        }
    }

    fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.sent.push(payload.to_vec());
        Ok(())
    }

    fn set_recv_timeout(&mut self, _timeout: Option<Duration>) -> Result<()> {
        Ok(())
    }
}
