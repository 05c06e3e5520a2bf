use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};

use crate::error::Result;

/// A connected robot controller stream. Implements Read + Write.
///
/// This is the I/O type returned by [`crate::TcpTransport`] operations.
pub struct RobotStream {
    inner: RobotStreamInner,
}

enum RobotStreamInner {
    Tcp(TcpStream),
}

impl Read for RobotStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            RobotStreamInner::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for RobotStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            RobotStreamInner::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            RobotStreamInner::Tcp(stream) => stream.flush(),
        }
    }
}

impl RobotStream {
    /// Create a RobotStream from a connected TCP stream.
    pub fn from_tcp(stream: TcpStream) -> Self {
        Self {
            inner: RobotStreamInner::Tcp(stream),
        }
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            RobotStreamInner::Tcp(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
        }
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            RobotStreamInner::Tcp(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
        }
    }

    /// Disable Nagle's algorithm. Message exchanges are small and latency bound.
    pub fn set_nodelay(&self, nodelay: bool) -> Result<()> {
        match &self.inner {
            RobotStreamInner::Tcp(stream) => stream.set_nodelay(nodelay).map_err(Into::into),
        }
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            RobotStreamInner::Tcp(stream) => {
                let cloned = stream.try_clone()?;
                Ok(Self::from_tcp(cloned))
            }
        }
    }

    /// Address of the connected peer.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        match &self.inner {
            RobotStreamInner::Tcp(stream) => stream.peer_addr().map_err(Into::into),
        }
    }

    /// Local address of this end of the stream.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        match &self.inner {
            RobotStreamInner::Tcp(stream) => stream.local_addr().map_err(Into::into),
        }
    }
}

impl std::fmt::Debug for RobotStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            RobotStreamInner::Tcp(stream) => f
                .debug_struct("RobotStream")
                .field("type", &"tcp")
                .field("peer", &stream.peer_addr().ok())
                .finish(),
        }
    }
}
