use std::fmt;

use tracing::{error, trace, warn};

use crate::buffer::ByteBuffer;
use crate::codes::{comm_type, msg_type, reply_code};
use crate::error::{MessageError, Result};

/// Width of the start and end tags.
pub const TAG_SIZE: usize = 4;

/// Sentinel written before every message on the wire.
pub const START_TAG: [u8; TAG_SIZE] = [0x02, 0x02, 0x02, 0x02];

/// Sentinel written after every message on the wire.
pub const END_TAG: [u8; TAG_SIZE] = [0x03, 0x03, 0x03, 0x03];

/// Width of the reserved message string header field.
pub const MESSAGE_STRING_LENGTH: usize = 10;

/// Header size: payload length (4) + type (2) + string (10) + version (1+1)
/// + sequence (2) + timestamp (4+4) + comm type (1) + reply code (1) = 30 bytes.
pub const HEADER_SIZE: usize = 4 + 2 + MESSAGE_STRING_LENGTH + 1 + 1 + 2 + 4 + 4 + 1 + 1;

/// A header plus an opaque payload.
///
/// Layout:
/// ```text
/// ┌────────────┬──────┬─────────────┬─────┬─────┬─────┬─────────┬──────────┬──────┬───────┬─────────────┐
/// │ payload len│ type │ string      │ maj │ min │ seq │ ts sec  │ ts nsec  │ comm │ reply │ payload     │
/// │ u32        │ u16  │ [u8; 10]    │ u8  │ u8  │ u16 │ u32     │ u32      │ u8   │ u8    │ len bytes   │
/// └────────────┴──────┴─────────────┴─────┴─────┴─────┴─────────┴──────────┴──────┴───────┴─────────────┘
/// ```
///
/// Not safe for concurrent mutation; give each thread its own message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleMessage {
    payload_length: u32,
    message_type: u16,
    message_string: [u8; MESSAGE_STRING_LENGTH],
    version_major: u8,
    version_minor: u8,
    sequence: u16,
    timestamp_sec: u32,
    timestamp_nsec: u32,
    comm_type: u8,
    reply_code: u8,
    data: ByteBuffer,
}

impl SimpleMessage {
    /// Create an empty message. It does not validate until initialized.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate every header field and copy `data` in as the payload.
    ///
    /// Sequence and timestamp are reset to zero and the message string is
    /// zero-filled. The fields stay populated even when validation fails;
    /// the returned error says why the message must not be sent.
    pub fn init(
        &mut self,
        message_type: u16,
        version_major: u8,
        version_minor: u8,
        comm_type: u8,
        reply_code: u8,
        data: &ByteBuffer,
    ) -> Result<()> {
        trace!(
            message_type,
            comm_type,
            reply_code,
            data_len = data.len(),
            "initializing message"
        );
        self.message_type = message_type;
        self.message_string = [0; MESSAGE_STRING_LENGTH];
        self.version_major = version_major;
        self.version_minor = version_minor;
        self.comm_type = comm_type;
        self.reply_code = reply_code;
        self.sequence = 0;
        self.timestamp_sec = 0;
        self.timestamp_nsec = 0;
        self.data.copy_from(data);
        self.payload_length = self.data.len() as u32;

        self.validate()
    }

    /// Parse a header (and payload, when present) from the front of `buffer`.
    ///
    /// Fails without touching `self` when `buffer` is shorter than
    /// [`HEADER_SIZE`]. Otherwise the header fields are consumed in order;
    /// if at least `payload_length` bytes follow they become the payload,
    /// else the payload is left empty. Validation runs either way.
    pub fn init_from_buffer(&mut self, buffer: &mut ByteBuffer) -> Result<()> {
        if buffer.len() < HEADER_SIZE {
            error!(
                size = buffer.len(),
                needed = HEADER_SIZE,
                "failed to init message, buffer size too small"
            );
            return Err(MessageError::BufferTooShort {
                needed: HEADER_SIZE,
                available: buffer.len(),
            });
        }

        self.payload_length = buffer.unload_front()?;
        self.message_type = buffer.unload_front()?;
        buffer.unload_front_bytes(&mut self.message_string)?;
        self.version_major = buffer.unload_front()?;
        self.version_minor = buffer.unload_front()?;
        self.sequence = buffer.unload_front()?;
        self.timestamp_sec = buffer.unload_front()?;
        self.timestamp_nsec = buffer.unload_front()?;
        self.comm_type = buffer.unload_front()?;
        self.reply_code = buffer.unload_front()?;
        trace!(
            payload_length = self.payload_length,
            message_type = self.message_type,
            version_major = self.version_major,
            version_minor = self.version_minor,
            comm_type = self.comm_type,
            reply_code = self.reply_code,
            "unloaded header"
        );

        let payload_length = self.payload_length as usize;
        if buffer.len() >= payload_length {
            self.data = buffer.unload_front_buffer(payload_length)?;
        } else {
            self.data.init();
        }

        self.validate()
    }

    /// Parse a message from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut buffer = ByteBuffer::from_slice(bytes)?;
        let mut message = Self::new();
        message.init_from_buffer(&mut buffer)?;
        Ok(message)
    }

    /// Serialize header then payload into `out`, replacing its contents.
    ///
    /// The payload length written is the size of the current payload.
    pub fn to_byte_array(&self, out: &mut ByteBuffer) -> Result<()> {
        out.init();
        out.atomically(|out| {
            out.load(self.data.len() as u32)?;
            out.load(self.message_type)?;
            out.load_bytes(&self.message_string)?;
            out.load(self.version_major)?;
            out.load(self.version_minor)?;
            out.load(self.sequence)?;
            out.load(self.timestamp_sec)?;
            out.load(self.timestamp_nsec)?;
            out.load(self.comm_type)?;
            out.load(self.reply_code)?;
            if !self.data.is_empty() {
                out.load_buffer(&self.data)?;
            }
            Ok(())
        })
    }

    /// Check the header invariants.
    ///
    /// Message type and comm type must not be INVALID, and the reply code
    /// must be set exactly when the comm type is SERVICE_REPLY.
    pub fn validate(&self) -> Result<()> {
        if self.message_type == msg_type::INVALID {
            warn!(message_type = self.message_type, "invalid message type");
            return Err(MessageError::InvalidMessageType);
        }

        if self.comm_type == comm_type::INVALID {
            warn!(comm_type = self.comm_type, "invalid comm type");
            return Err(MessageError::InvalidCommType);
        }

        let is_reply = self.comm_type == comm_type::SERVICE_REPLY;
        let has_reply_code = self.reply_code != reply_code::INVALID;
        if is_reply != has_reply_code {
            warn!(
                comm_type = self.comm_type,
                reply_code = self.reply_code,
                "invalid reply"
            );
            return Err(MessageError::ReplyCodeMismatch {
                comm_type: self.comm_type,
                reply_code: self.reply_code,
            });
        }

        Ok(())
    }

    /// Whether [`SimpleMessage::validate`] succeeds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Fixed header size in bytes.
    pub const fn header_size() -> usize {
        HEADER_SIZE
    }

    /// Full serialized size: header plus current payload.
    pub fn msg_length(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }

    /// Payload length as declared by the header.
    pub fn payload_length(&self) -> u32 {
        self.payload_length
    }

    /// Size of the payload currently held.
    pub fn data_length(&self) -> usize {
        self.data.len()
    }

    pub fn message_type(&self) -> u16 {
        self.message_type
    }

    /// The reserved message string field.
    pub fn message_string(&self) -> &[u8; MESSAGE_STRING_LENGTH] {
        &self.message_string
    }

    pub fn version_major(&self) -> u8 {
        self.version_major
    }

    pub fn version_minor(&self) -> u8 {
        self.version_minor
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn set_sequence(&mut self, sequence: u16) {
        self.sequence = sequence;
    }

    pub fn timestamp_sec(&self) -> u32 {
        self.timestamp_sec
    }

    pub fn timestamp_nsec(&self) -> u32 {
        self.timestamp_nsec
    }

    pub fn set_timestamp(&mut self, sec: u32, nsec: u32) {
        self.timestamp_sec = sec;
        self.timestamp_nsec = nsec;
    }

    pub fn comm_type(&self) -> u8 {
        self.comm_type
    }

    pub fn reply_code(&self) -> u8 {
        self.reply_code
    }

    /// Borrow the payload.
    pub fn data(&self) -> &ByteBuffer {
        &self.data
    }

    /// Replace the payload with a copy of `data`.
    ///
    /// The declared payload length is left as is; it is authoritative for a
    /// message being received, and [`SimpleMessage::to_byte_array`] always
    /// writes the actual payload size.
    pub fn set_data(&mut self, data: &ByteBuffer) {
        self.data.copy_from(data);
    }
}

impl fmt::Display for SimpleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self
            .message_string
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(MESSAGE_STRING_LENGTH);
        writeln!(f, "payload_length: {}", self.payload_length)?;
        writeln!(
            f,
            "message_type: {} ({})",
            self.message_type,
            msg_type::name(self.message_type)
        )?;
        writeln!(
            f,
            "message_string: {}",
            String::from_utf8_lossy(&self.message_string[..end])
        )?;
        writeln!(f, "version_major: {}", self.version_major)?;
        writeln!(f, "version_minor: {}", self.version_minor)?;
        writeln!(f, "seq: {}", self.sequence)?;
        writeln!(f, "timestamp_sec: {}", self.timestamp_sec)?;
        writeln!(f, "timestamp_nsec: {}", self.timestamp_nsec)?;
        writeln!(
            f,
            "comm_type: {} ({})",
            self.comm_type,
            comm_type::name(self.comm_type)
        )?;
        write!(
            f,
            "reply_type: {} ({})",
            self.reply_code,
            reply_code::name(self.reply_code)
        )
    }
}
