/// Errors that can occur while building, parsing or validating messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// Fewer bytes are available than the requested unload needs.
    #[error("buffer too short ({available} bytes available, {needed} needed)")]
    BufferTooShort { needed: usize, available: usize },

    /// A load would grow the buffer past its hard cap.
    #[error("buffer full ({size} bytes requested, max {max})")]
    BufferFull { size: usize, max: usize },

    /// The message type is INVALID (0).
    #[error("invalid message type")]
    InvalidMessageType,

    /// The comm type is INVALID (0).
    #[error("invalid comm type")]
    InvalidCommType,

    /// The reply code does not agree with the comm type.
    ///
    /// Service replies must carry a reply code; everything else must not.
    #[error("reply code {reply_code} not allowed with comm type {comm_type}")]
    ReplyCodeMismatch { comm_type: u8, reply_code: u8 },
}

pub type Result<T> = std::result::Result<T, MessageError>;
