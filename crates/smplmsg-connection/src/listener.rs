use std::fmt::Display;
use std::net::{SocketAddr, ToSocketAddrs};

use smplmsg_transport::{RobotStream, TcpTransport};
use tracing::debug;

use crate::connection::{ConnectionConfig, MessageConnection};
use crate::error::Result;

/// Listens for and accepts message connections over TCP.
pub struct MessageListener {
    transport: TcpTransport,
    config: ConnectionConfig,
}

impl MessageListener {
    /// Bind to a TCP address.
    pub fn bind<A: ToSocketAddrs + Display>(addr: A) -> Result<Self> {
        let transport = TcpTransport::bind(addr)?;
        Ok(Self {
            transport,
            config: ConnectionConfig::default(),
        })
    }

    /// Override the configuration applied to accepted connections.
    pub fn with_config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Accept the next connection (blocking).
    pub fn accept(&self) -> Result<MessageConnection<RobotStream>> {
        let stream = self.transport.accept()?;
        stream.set_nodelay(true)?;
        if let Ok(peer) = stream.peer_addr() {
            debug!(%peer, "accepted message connection");
        }
        MessageConnection::with_config_tcp(stream, self.config.clone())
    }

    /// Bound address, with the actual port when bound to port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    /// Configuration applied to accepted connections.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

impl std::fmt::Debug for MessageListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageListener")
            .field("addr", &self.local_addr())
            .field("config", &self.config)
            .finish()
    }
}
