use smplmsg_message::MessageError;

/// Errors that can occur while converting payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// Message-level error (short buffer, full buffer, invalid header).
    #[error("message error: {0}")]
    Message(#[from] MessageError),

    /// The message carries a different payload type.
    #[error("wrong message type {received} (expected {expected})")]
    WrongMessageType { expected: u16, received: u16 },

    /// A joint index beyond the fixed joint count.
    #[error("joint index {index} out of range (max {max})")]
    JointIndexOutOfRange { index: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, PayloadError>;
