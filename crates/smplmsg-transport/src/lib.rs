//! Blocking byte-stream transport for the simple message protocol.
//!
//! Provides the two primitives every message connection is built on:
//! - [`ByteTransport::send_bytes`] writes a whole buffer or fails
//! - [`ByteTransport::receive_bytes`] reads exactly `len` bytes or fails
//!
//! Any `Read + Write` stream is a [`ByteTransport`]. [`TcpTransport`] and
//! [`RobotStream`] cover the usual TCP link to a robot controller, and
//! [`Loopback`] is an in-memory transport for tests and local simulation.

pub mod error;
pub mod io;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use io::{ByteTransport, Loopback};
pub use stream::RobotStream;
pub use tcp::TcpTransport;
