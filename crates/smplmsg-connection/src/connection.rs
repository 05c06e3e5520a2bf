use std::time::Duration;

use bytes::{BufMut, BytesMut};
use smplmsg_message::{ByteBuffer, SimpleMessage, END_TAG, HEADER_SIZE, START_TAG, TAG_SIZE};
use smplmsg_transport::{ByteTransport, RobotStream};
use tracing::{error, info, trace};

use crate::error::{ConnectionError, Result};

/// Largest payload a single message can carry: the rest of a full buffer
/// once the header is in it.
pub const DEFAULT_MAX_PAYLOAD: usize = ByteBuffer::MAX_SIZE - HEADER_SIZE;

const INITIAL_BUFFER_CAPACITY: usize = 2 * TAG_SIZE + ByteBuffer::MAX_SIZE;

/// Connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Maximum payload size accepted in either direction.
    pub max_payload_size: usize,
    /// Read timeout applied to TCP streams. `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Write timeout applied to TCP streams. `None` blocks indefinitely.
    pub write_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

/// Sends and receives framed simple messages over a byte transport.
///
/// Wire frame:
/// ```text
/// ┌─────────────┬──────────────┬──────────────────┬─────────────┐
/// │ Start tag   │ Header       │ Payload          │ End tag     │
/// │ 02 02 02 02 │ (30 bytes)   │ (length bytes)   │ 03 03 03 03 │
/// └─────────────┴──────────────┴──────────────────┴─────────────┘
/// ```
///
/// Every call is blocking and self-contained; nothing is carried between
/// calls except the transport itself. Nothing is retried, and a stream that
/// fails a tag check is not resynchronized.
pub struct MessageConnection<T> {
    inner: T,
    buf: BytesMut,
    config: ConnectionConfig,
}

impl<T: ByteTransport> MessageConnection<T> {
    /// Create a new connection with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ConnectionConfig::default())
    }

    /// Create a new connection with explicit configuration.
    ///
    /// Timeouts are not applied here; see [`MessageConnection::with_config_tcp`].
    pub fn with_config(inner: T, config: ConnectionConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Validate, serialize and send `message` as one frame.
    ///
    /// An invalid message is rejected before anything reaches the transport.
    pub fn send_msg(&mut self, message: &SimpleMessage) -> Result<()> {
        message.validate()?;

        if message.data_length() > self.config.max_payload_size {
            error!(
                size = message.data_length(),
                max = self.config.max_payload_size,
                "payload too large to send"
            );
            return Err(ConnectionError::PayloadTooLarge {
                size: message.data_length(),
                max: self.config.max_payload_size,
            });
        }

        let mut body = ByteBuffer::new();
        message.to_byte_array(&mut body)?;

        self.buf.clear();
        self.buf.reserve(2 * TAG_SIZE + body.len());
        self.buf.put_slice(&START_TAG);
        self.buf.put_slice(body.as_slice());
        self.buf.put_slice(&END_TAG);

        trace!(
            message_type = message.message_type(),
            frame_len = self.buf.len(),
            "sending frame"
        );
        self.inner.send_bytes(&self.buf)?;
        Ok(())
    }

    /// Receive one frame into `message`.
    ///
    /// On error `message` may be partially populated and must be discarded.
    /// In particular an end tag mismatch is reported after header and
    /// payload have already been stored.
    pub fn receive_msg(&mut self, message: &mut SimpleMessage) -> Result<()> {
        let start = self.receive_tag()?;
        if start != START_TAG {
            error!(
                expected = ?START_TAG,
                received = ?start,
                "invalid start tag"
            );
            return Err(ConnectionError::InvalidStartTag {
                expected: START_TAG,
                received: start,
            });
        }

        self.buf.clear();
        self.inner.receive_bytes(&mut self.buf, HEADER_SIZE)?;
        let mut header = ByteBuffer::from_slice(&self.buf)?;
        message.init_from_buffer(&mut header)?;

        let payload_len = message.payload_length() as usize;
        if payload_len > self.config.max_payload_size {
            error!(
                size = payload_len,
                max = self.config.max_payload_size,
                "received header announces oversized payload"
            );
            return Err(ConnectionError::PayloadTooLarge {
                size: payload_len,
                max: self.config.max_payload_size,
            });
        }

        if payload_len > 0 {
            self.buf.clear();
            self.inner.receive_bytes(&mut self.buf, payload_len)?;
            let payload = ByteBuffer::from_slice(&self.buf)?;
            message.set_data(&payload);
        }
        trace!(
            message_type = message.message_type(),
            payload_len,
            "received header and payload"
        );

        let end = self.receive_tag()?;
        if end != END_TAG {
            error!(
                expected = ?END_TAG,
                received = ?end,
                message_type = message.message_type(),
                "invalid end tag"
            );
            return Err(ConnectionError::InvalidEndTag {
                expected: END_TAG,
                received: end,
            });
        }

        Ok(())
    }

    /// Receive one frame into a fresh message.
    pub fn receive(&mut self) -> Result<SimpleMessage> {
        let mut message = SimpleMessage::new();
        self.receive_msg(&mut message)?;
        Ok(message)
    }

    /// Send `send`, then receive the reply into `recv`.
    ///
    /// Nothing is received if the send fails. `verbose` only adds log output.
    pub fn send_and_receive_msg(
        &mut self,
        send: &SimpleMessage,
        recv: &mut SimpleMessage,
        verbose: bool,
    ) -> Result<()> {
        self.send_msg(send)?;
        if verbose {
            info!(
                message_type = send.message_type(),
                comm_type = send.comm_type(),
                "sent message"
            );
        }

        self.receive_msg(recv)?;
        if verbose {
            info!(
                message_type = recv.message_type(),
                comm_type = recv.comm_type(),
                reply_code = recv.reply_code(),
                "received message"
            );
        }
        Ok(())
    }

    fn receive_tag(&mut self) -> Result<[u8; TAG_SIZE]> {
        self.buf.clear();
        self.inner.receive_bytes(&mut self.buf, TAG_SIZE)?;
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&self.buf[..TAG_SIZE]);
        Ok(tag)
    }
}

impl<T> MessageConnection<T> {
    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the connection and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent sends and receives.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

impl MessageConnection<RobotStream> {
    /// Create a connection over a TCP stream and apply the configured timeouts.
    pub fn with_config_tcp(inner: RobotStream, config: ConnectionConfig) -> Result<Self> {
        inner.set_read_timeout(config.read_timeout)?;
        inner.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

impl<T> std::fmt::Debug for MessageConnection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageConnection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use smplmsg_message::{comm_type, msg_type, reply_code, MessageError};
    use smplmsg_transport::{Loopback, TransportError};

    use super::*;

    fn message(message_type: u16, comm: u8, reply: u8, payload: &[u8]) -> SimpleMessage {
        let data = ByteBuffer::from_slice(payload).unwrap();
        let mut msg = SimpleMessage::new();
        msg.init(message_type, 0, 0, comm, reply, &data).unwrap();
        msg
    }

    fn frame_bytes(msg: &SimpleMessage) -> Vec<u8> {
        let mut conn = MessageConnection::new(Loopback::new());
        conn.send_msg(msg).unwrap();
        conn.into_inner().drain_pending()
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("read failed"))
        }
    }

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("write failed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn frame_layout() {
        let msg = message(msg_type::PING, comm_type::TOPIC, reply_code::INVALID, b"abc");
        let bytes = frame_bytes(&msg);

        assert_eq!(bytes.len(), TAG_SIZE + HEADER_SIZE + 3 + TAG_SIZE);
        assert_eq!(&bytes[..4], &START_TAG);
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
        assert_eq!(&bytes[8..10], &msg_type::PING.to_le_bytes());
        assert_eq!(&bytes[34..37], b"abc");
        assert_eq!(&bytes[37..], &END_TAG);
    }

    #[test]
    fn send_then_receive_reconstructs_message() {
        let mut msg = message(
            msg_type::JOINT_POSITION,
            comm_type::SERVICE_REQUEST,
            reply_code::INVALID,
            &[1, 2, 3, 4, 5, 6, 7, 8],
        );
        msg.set_sequence(42);
        msg.set_timestamp(1_700_000_000, 500);

        let mut conn = MessageConnection::new(Loopback::new());
        conn.send_msg(&msg).unwrap();
        let received = conn.receive().unwrap();

        assert_eq!(received, msg);
        assert_eq!(conn.get_ref().pending(), 0);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let msg = message(msg_type::PING, comm_type::SERVICE_REQUEST, reply_code::INVALID, &[]);
        let mut conn = MessageConnection::new(Loopback::new());
        conn.send_msg(&msg).unwrap();
        assert_eq!(conn.get_ref().pending(), TAG_SIZE + HEADER_SIZE + TAG_SIZE);

        let received = conn.receive().unwrap();
        assert_eq!(received, msg);
        assert!(received.data().is_empty());
    }

    #[test]
    fn consecutive_frames_stay_aligned() {
        let first = message(msg_type::PING, comm_type::TOPIC, reply_code::INVALID, b"one");
        let second = message(msg_type::STATUS, comm_type::TOPIC, reply_code::INVALID, b"two!");

        let mut conn = MessageConnection::new(Loopback::new());
        conn.send_msg(&first).unwrap();
        conn.send_msg(&second).unwrap();

        assert_eq!(conn.receive().unwrap(), first);
        assert_eq!(conn.receive().unwrap(), second);
    }

    #[test]
    fn invalid_message_is_not_sent() {
        let mut msg = SimpleMessage::new();
        let data = ByteBuffer::new();
        assert!(msg
            .init(msg_type::PING, 0, 0, comm_type::SERVICE_REPLY, reply_code::INVALID, &data)
            .is_err());

        let mut conn = MessageConnection::new(Loopback::new());
        let err = conn.send_msg(&msg).unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::Message(MessageError::ReplyCodeMismatch { .. })
        ));
        assert_eq!(conn.get_ref().pending(), 0);
    }

    #[test]
    fn corrupted_start_tag_fails() {
        let msg = message(msg_type::PING, comm_type::TOPIC, reply_code::INVALID, b"x");
        let mut bytes = frame_bytes(&msg);
        bytes[0] = 0x00;

        let mut conn = MessageConnection::new(Loopback::with_bytes(&bytes));
        let mut received = SimpleMessage::new();
        let err = conn.receive_msg(&mut received).unwrap_err();

        match err {
            ConnectionError::InvalidStartTag { expected, received } => {
                assert_eq!(expected, START_TAG);
                assert_eq!(received, [0x00, 0x02, 0x02, 0x02]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(received, SimpleMessage::new());
        assert!(!received.is_valid());
    }

    #[test]
    fn corrupted_end_tag_fails_after_populating() {
        let msg = message(msg_type::PING, comm_type::TOPIC, reply_code::INVALID, b"xy");
        let mut bytes = frame_bytes(&msg);
        let last = bytes.len() - 1;
        bytes[last] = 0xFF;

        let mut conn = MessageConnection::new(Loopback::with_bytes(&bytes));
        let mut received = SimpleMessage::new();
        let err = conn.receive_msg(&mut received).unwrap_err();

        assert!(matches!(
            err,
            ConnectionError::InvalidEndTag {
                received: [0x03, 0x03, 0x03, 0xFF],
                ..
            }
        ));
        assert_eq!(received.data().as_slice(), b"xy");
    }

    #[test]
    fn truncated_frame_reports_transport_error() {
        let msg = message(msg_type::PING, comm_type::TOPIC, reply_code::INVALID, b"abcdef");
        let bytes = frame_bytes(&msg);

        for cut in [2, TAG_SIZE + 10, TAG_SIZE + HEADER_SIZE + 2, bytes.len() - 1] {
            let mut conn = MessageConnection::new(Loopback::with_bytes(&bytes[..cut]));
            let err = conn.receive().unwrap_err();
            assert!(
                matches!(
                    err,
                    ConnectionError::Transport(TransportError::ConnectionClosed { .. })
                ),
                "cut at {cut}: {err}"
            );
        }
    }

    #[test]
    fn invalid_header_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&START_TAG);
        bytes.extend_from_slice(&[0u8; HEADER_SIZE]);
        bytes.extend_from_slice(&END_TAG);

        let mut conn = MessageConnection::new(Loopback::with_bytes(&bytes));
        let err = conn.receive().unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::Message(MessageError::InvalidMessageType)
        ));
    }

    #[test]
    fn oversized_payload_rejected_before_reading() {
        let msg = message(msg_type::PING, comm_type::TOPIC, reply_code::INVALID, &[9; 64]);
        let bytes = frame_bytes(&msg);

        let config = ConnectionConfig {
            max_payload_size: 16,
            ..ConnectionConfig::default()
        };
        let mut conn = MessageConnection::with_config(Loopback::with_bytes(&bytes), config);
        let err = conn.receive().unwrap_err();

        assert!(matches!(
            err,
            ConnectionError::PayloadTooLarge { size: 64, max: 16 }
        ));
        assert_eq!(conn.get_ref().pending(), 64 + TAG_SIZE);
    }

    #[test]
    fn oversized_payload_rejected_on_send() {
        let msg = message(msg_type::PING, comm_type::TOPIC, reply_code::INVALID, &[9; 64]);
        let mut conn = MessageConnection::new(Loopback::new());
        conn.set_max_payload_size(32);

        let err = conn.send_msg(&msg).unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::PayloadTooLarge { size: 64, max: 32 }
        ));
        assert_eq!(conn.get_ref().pending(), 0);
    }

    #[test]
    fn send_and_receive_skips_receive_on_send_failure() {
        let msg = message(msg_type::PING, comm_type::SERVICE_REQUEST, reply_code::INVALID, &[]);
        let mut conn = MessageConnection::new(Broken);
        let mut reply = SimpleMessage::new();

        let err = conn.send_and_receive_msg(&msg, &mut reply, true).unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::Transport(TransportError::Io(_))
        ));
        assert_eq!(reply, SimpleMessage::new());
    }

    #[test]
    fn send_and_receive_over_loopback_sees_own_frame() {
        let msg = message(msg_type::PING, comm_type::SERVICE_REQUEST, reply_code::INVALID, &[]);
        let mut conn = MessageConnection::new(Loopback::new());
        let mut echoed = SimpleMessage::new();

        conn.send_and_receive_msg(&msg, &mut echoed, false).unwrap();
        assert_eq!(echoed, msg);
    }

    #[test]
    fn default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.max_payload_size, 994);
        assert_eq!(config.read_timeout, None);
        assert_eq!(config.write_timeout, None);

        let conn = MessageConnection::new(Loopback::new());
        assert_eq!(conn.config(), &config);
        assert!(format!("{conn:?}").contains("MessageConnection"));
    }
}
