use crate::{RawMessage, Result, Transport, TransportError};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info};

/// Largest frame read in one receive call.
pub const RECV_BUFFER_LEN: usize = 4048;

/// TCP stream carrying one frame per read.
///
/// There is no length prefix or delimiter: whatever a single read returns is a
/// frame, so peers must not pipeline commands ahead of the acknowledgment.
pub struct TcpTransport {
    stream: TcpStream,
    peer: SocketAddr,
    buf: Vec<u8>,
}

impl TcpTransport {
    /// Connect in the client role. Every resolved address is tried in order.
    pub fn connect(addr: &str, timeout: Option<Duration>) -> Result<Self> {
        let candidates: Vec<SocketAddr> = addr
            .to_socket_addrs()
            .map_err(|e| connect_failed(addr, e.to_string()))?
            .collect();

        let mut last_err = None;
        for candidate in candidates {
            let attempt = match timeout {
                Some(limit) => TcpStream::connect_timeout(&candidate, limit),
                None => TcpStream::connect(candidate),
            };
            match attempt {
                Ok(stream) => {
                    info!(peer = %candidate, "connected");
                    // Setup after the handshake still counts as part of connecting
                    return Self::from_stream(stream).map_err(|e| setup_failed(addr, e));
                }
                Err(e) => {
                    debug!(peer = %candidate, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        Err(connect_failed(
            addr,
            last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "address resolved to nothing".to_string()),
        ))
    }

    /// Wait for one peer on `listener` (server role).
    pub fn accept(listener: &TcpListener) -> Result<Self> {
        let (stream, peer) = listener.accept().map_err(io_error)?;
        info!(%peer, "accepted connection");
        Self::from_stream(stream)
    }

    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer = stream.peer_addr().map_err(io_error)?;
        // Frames are tiny and latency matters more than batching
        stream.set_nodelay(true).map_err(io_error)?;
        Ok(Self {
            stream,
            peer,
            buf: vec![0u8; RECV_BUFFER_LEN],
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for TcpTransport {
    fn recv(&mut self) -> Result<RawMessage> {
        loop {
            match self.stream.read(&mut self.buf) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => return Ok(RawMessage::new(&self.buf[..n])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(recv_error(e)),
            }
        }
    }

    fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.stream.write_all(payload).map_err(io_error)?;
        self.stream.flush().map_err(io_error)
    }

    fn set_recv_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout).map_err(io_error)
    }
}

fn connect_failed(addr: &str, reason: String) -> TransportError {
    TransportError::ConnectFailed {
        addr: addr.to_string(),
        reason,
    }
}

fn setup_failed(addr: &str, e: TransportError) -> TransportError {
    match e {
        TransportError::Io(reason) => connect_failed(addr, reason),
        other => connect_failed(addr, other.to_string()),
    }
}

fn io_error(e: io::Error) -> TransportError {
    TransportError::Io(e.to_string())
}

fn recv_error(e: io::Error) -> TransportError {
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => TransportError::Timeout,
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => TransportError::Closed,
        _ => io_error(e),
    }
}
