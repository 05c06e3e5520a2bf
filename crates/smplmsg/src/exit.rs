use std::fmt;
use std::io;

use smplmsg_connection::ConnectionError;
use smplmsg_message::MessageError;
use smplmsg_payload::PayloadError;
use smplmsg_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        // Socket read timeouts surface as WouldBlock on Unix.
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => TRANSPORT_ERROR,
        io::ErrorKind::AddrInUse | io::ErrorKind::AddrNotAvailable => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Bind { source, .. }
        | TransportError::Connect { source, .. }
        | TransportError::Accept(source)
        | TransportError::Io(source) => io_error(context, source),
        TransportError::ConnectionClosed { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
    }
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn payload_error(context: &str, err: PayloadError) -> CliError {
    match err {
        PayloadError::Message(err) => message_error(context, err),
        PayloadError::JointIndexOutOfRange { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        PayloadError::WrongMessageType { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn connection_error(context: &str, err: ConnectionError) -> CliError {
    match err {
        ConnectionError::Transport(err) => transport_error(context, err),
        ConnectionError::Message(err) => message_error(context, err),
        ConnectionError::InvalidStartTag { .. }
        | ConnectionError::InvalidEndTag { .. }
        | ConnectionError::PayloadTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_timeout_maps_to_timeout_code() {
        let err = connection_error(
            "request failed",
            ConnectionError::Transport(TransportError::Io(io::Error::from(
                io::ErrorKind::WouldBlock,
            ))),
        );
        assert_eq!(err.code, TIMEOUT);
        assert!(err.message.starts_with("request failed: "));
    }

    #[test]
    fn refused_connect_maps_to_transport_code() {
        let err = transport_error(
            "connect failed",
            TransportError::Connect {
                addr: "127.0.0.1:1".to_string(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
    }

    #[test]
    fn protocol_errors_map_to_data_invalid() {
        let err = connection_error(
            "receive failed",
            ConnectionError::InvalidStartTag {
                expected: [2; 4],
                received: [0; 4],
            },
        );
        assert_eq!(err.code, DATA_INVALID);

        let err = connection_error(
            "receive failed",
            ConnectionError::Message(MessageError::InvalidCommType),
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn joint_index_is_a_usage_error() {
        let err = payload_error(
            "building message failed",
            PayloadError::JointIndexOutOfRange { index: 10, max: 10 },
        );
        assert_eq!(err.code, USAGE);
    }
}
