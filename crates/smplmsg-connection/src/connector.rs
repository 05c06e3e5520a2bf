use std::fmt::Display;
use std::net::ToSocketAddrs;
use std::time::Duration;

use smplmsg_transport::{RobotStream, TcpTransport};
use tracing::debug;

use crate::connection::{ConnectionConfig, MessageConnection};
use crate::error::Result;

/// Connect to a robot controller with default configuration.
pub fn connect<A: ToSocketAddrs + Display>(addr: A) -> Result<MessageConnection<RobotStream>> {
    connect_with_config(addr, ConnectionConfig::default(), None)
}

/// Connect with explicit configuration.
///
/// `connect_timeout` bounds the TCP connect itself; the read and write
/// timeouts from `config` apply to every exchange afterwards.
pub fn connect_with_config<A: ToSocketAddrs + Display>(
    addr: A,
    config: ConnectionConfig,
    connect_timeout: Option<Duration>,
) -> Result<MessageConnection<RobotStream>> {
    let stream = match connect_timeout {
        Some(timeout) => TcpTransport::connect_timeout(&addr, timeout)?,
        None => TcpTransport::connect(&addr)?,
    };
    stream.set_nodelay(true)?;
    debug!(%addr, ?config, "message connection established");
    MessageConnection::with_config_tcp(stream, config)
}
