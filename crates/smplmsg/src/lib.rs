//! Simple message: the framed TCP protocol spoken by industrial robot controllers.
//!
//! A message is a fixed 30-byte header plus a typed payload, framed on the
//! wire by start and end tags. This crate re-exports the layers that
//! implement it.
//!
//! # Crate Structure
//!
//! - [`transport`]: blocking byte transport (TCP, in-memory loopback)
//! - [`message`]: byte buffer, serialization contract, message envelope
//! - [`payload`]: joint data, trajectory points, robot status, ping
//! - [`connection`]: framed send/receive and TCP connect/listen
//!
//! ```no_run
//! use smplmsg::connection::connect;
//! use smplmsg::payload::{JointData, TypedMessage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = connect("127.0.0.1:11002")?;
//! let position = JointData::from([0.0; 10]);
//! conn.send_msg(&position.to_topic()?)?;
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use smplmsg_transport::*;
}

/// Re-export message types.
pub mod message {
    pub use smplmsg_message::*;
}

/// Re-export payload types.
pub mod payload {
    pub use smplmsg_payload::*;
}

/// Re-export connection types.
pub mod connection {
    pub use smplmsg_connection::*;
}
