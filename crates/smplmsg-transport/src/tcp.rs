use std::fmt::Display;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::RobotStream;

/// TCP transport.
///
/// Provides bind/accept/connect over TCP, the link robot controllers expose
/// for simple message traffic.
pub struct TcpTransport {
    listener: TcpListener,
    addr: SocketAddr,
}

impl TcpTransport {
    /// Bind and listen on a TCP address.
    ///
    /// Port 0 asks the OS for an ephemeral port; [`TcpTransport::local_addr`]
    /// reports the one chosen.
    pub fn bind<A: ToSocketAddrs + Display>(addr: A) -> Result<Self> {
        let listener = TcpListener::bind(&addr).map_err(|e| TransportError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;
        let local = listener.local_addr().map_err(|e| TransportError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;

        info!(addr = %local, "listening on tcp");

        Ok(Self {
            listener,
            addr: local,
        })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<RobotStream> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(%peer, "accepted connection");
        Ok(RobotStream::from_tcp(stream))
    }

    /// Connect to a listening TCP endpoint (blocking).
    pub fn connect<A: ToSocketAddrs + Display>(addr: A) -> Result<RobotStream> {
        let stream = TcpStream::connect(&addr).map_err(|e| TransportError::Connect {
            addr: addr.to_string(),
            source: e,
        })?;
        debug!(%addr, "connected over tcp");
        Ok(RobotStream::from_tcp(stream))
    }

    /// Connect with an upper bound on the time spent per resolved address.
    pub fn connect_timeout<A: ToSocketAddrs + Display>(
        addr: A,
        timeout: Duration,
    ) -> Result<RobotStream> {
        let resolved = addr.to_socket_addrs().map_err(|e| TransportError::Connect {
            addr: addr.to_string(),
            source: e,
        })?;

        let mut last_err = None;
        for candidate in resolved {
            match TcpStream::connect_timeout(&candidate, timeout) {
                Ok(stream) => {
                    debug!(addr = %candidate, "connected over tcp");
                    return Ok(RobotStream::from_tcp(stream));
                }
                Err(err) => last_err = Some(err),
            }
        }

        Err(TransportError::Connect {
            addr: addr.to_string(),
            source: last_err.unwrap_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "address resolved to no candidates",
                )
            }),
        })
    }

    /// The address this transport is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "tcp"
    }
}
