//! Framed message exchange for the simple message protocol.
//!
//! A [`MessageConnection`] wraps any [`smplmsg_transport::ByteTransport`] and
//! moves whole [`smplmsg_message::SimpleMessage`]s across it, each framed as
//! start tag, header, payload, end tag. [`connect`] and [`MessageListener`]
//! produce connections over TCP.

pub mod connection;
pub mod connector;
pub mod error;
pub mod listener;
pub mod ports;

pub use connection::{ConnectionConfig, MessageConnection, DEFAULT_MAX_PAYLOAD};
pub use connector::{connect, connect_with_config};
pub use error::{ConnectionError, Result};
pub use listener::MessageListener;
