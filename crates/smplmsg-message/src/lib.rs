//! Fixed-layout serialization and the simple message envelope.
//!
//! This is the wire-format layer shared with the robot controller. Every
//! message is a fixed 30-byte header followed by an opaque payload:
//! - [`ByteBuffer`] appends typed values to its tail and consumes them from
//!   either end
//! - [`Serializable`] is the contract each payload type implements
//! - [`SimpleMessage`] owns the header fields and the payload bytes
//!
//! All multi-byte values are little-endian with fixed widths.

pub mod buffer;
pub mod codes;
pub mod error;
pub mod message;
pub mod serialize;

pub use buffer::{ByteBuffer, WireValue};
pub use codes::msg_type::name as msg_type_name;
pub use codes::{comm_type, msg_type, reply_code};
pub use error::{MessageError, Result};
pub use message::{
    SimpleMessage, END_TAG, HEADER_SIZE, MESSAGE_STRING_LENGTH, START_TAG, TAG_SIZE,
};
pub use serialize::Serializable;
