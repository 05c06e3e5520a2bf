use smplmsg_message::TAG_SIZE;

/// Errors that can occur while exchanging framed messages.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] smplmsg_transport::TransportError),

    /// Message-level error (invalid header, buffer limits).
    #[error("message error: {0}")]
    Message(#[from] smplmsg_message::MessageError),

    /// The frame did not begin with the start tag.
    #[error("invalid start tag {received:02x?} (expected {expected:02x?})")]
    InvalidStartTag {
        expected: [u8; TAG_SIZE],
        received: [u8; TAG_SIZE],
    },

    /// The frame did not end with the end tag.
    #[error("invalid end tag {received:02x?} (expected {expected:02x?})")]
    InvalidEndTag {
        expected: [u8; TAG_SIZE],
        received: [u8; TAG_SIZE],
    },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ConnectionError>;
