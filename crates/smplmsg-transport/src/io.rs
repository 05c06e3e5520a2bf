use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};

use bytes::BytesMut;

use crate::error::{Result, TransportError};

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// The byte-level primitives a message connection needs from its transport.
///
/// Both calls are all-or-nothing from the caller's point of view: a call
/// either moves exactly the requested bytes or reports failure.
pub trait ByteTransport {
    /// Write every byte of `bytes` to the peer (blocking).
    fn send_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read exactly `len` bytes from the peer and append them to `dst` (blocking).
    fn receive_bytes(&mut self, dst: &mut BytesMut, len: usize) -> Result<()>;
}

impl<T: Read + Write> ByteTransport for T {
    fn send_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.write(&bytes[offset..]) {
                Ok(0) => {
                    return Err(TransportError::ConnectionClosed {
                        expected: bytes.len(),
                        received: offset,
                    })
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                // An expired write timeout surfaces as WouldBlock on Unix.
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        loop {
            match self.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn receive_bytes(&mut self, dst: &mut BytesMut, len: usize) -> Result<()> {
        dst.reserve(len);
        let mut received = 0usize;
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        while received < len {
            let want = (len - received).min(READ_CHUNK_SIZE);
            let read = match self.read(&mut chunk[..want]) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            };

            if read == 0 {
                return Err(TransportError::ConnectionClosed {
                    expected: len,
                    received,
                });
            }

            dst.extend_from_slice(&chunk[..read]);
            received += read;
        }

        Ok(())
    }
}

/// In-memory transport: bytes written are read back in order.
///
/// Reads past the end of the written data report end-of-stream, so a short
/// frame surfaces as [`TransportError::ConnectionClosed`] exactly like a
/// peer hanging up mid-message.
#[derive(Debug, Default, Clone)]
pub struct Loopback {
    pending: VecDeque<u8>,
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loopback already holding `bytes`.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        Self {
            pending: bytes.iter().copied().collect(),
        }
    }

    /// Number of bytes written but not yet read.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drain everything written but not yet read.
    pub fn drain_pending(&mut self) -> Vec<u8> {
        self.pending.drain(..).collect()
    }
}

impl Read for Loopback {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for Loopback {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend(buf.iter().copied());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn loopback_roundtrip() {
        let mut transport = Loopback::new();
        transport.send_bytes(b"hello").unwrap();
        assert_eq!(transport.pending(), 5);

        let mut dst = BytesMut::new();
        transport.receive_bytes(&mut dst, 5).unwrap();
        assert_eq!(dst.as_ref(), b"hello");
        assert_eq!(transport.pending(), 0);
    }

    #[test]
    fn receive_appends_to_existing_bytes() {
        let mut transport = Loopback::with_bytes(b"world");
        let mut dst = BytesMut::from(&b"hello "[..]);
        transport.receive_bytes(&mut dst, 5).unwrap();
        assert_eq!(dst.as_ref(), b"hello world");
    }

    #[test]
    fn receive_exact_leaves_remainder() {
        let mut transport = Loopback::with_bytes(b"abcdef");
        let mut dst = BytesMut::new();
        transport.receive_bytes(&mut dst, 4).unwrap();
        assert_eq!(dst.as_ref(), b"abcd");
        assert_eq!(transport.drain_pending(), b"ef".to_vec());
    }

    #[test]
    fn short_stream_reports_connection_closed() {
        let mut transport = Loopback::with_bytes(b"abc");
        let mut dst = BytesMut::new();
        let err = transport.receive_bytes(&mut dst, 8).unwrap_err();
        assert!(matches!(
            err,
            TransportError::ConnectionClosed {
                expected: 8,
                received: 3
            }
        ));
    }

    #[test]
    fn zero_length_receive_reads_nothing() {
        let mut transport = Loopback::with_bytes(b"abc");
        let mut dst = BytesMut::new();
        transport.receive_bytes(&mut dst, 0).unwrap();
        assert!(dst.is_empty());
        assert_eq!(transport.pending(), 3);
    }

    #[test]
    fn partial_reads_are_reassembled() {
        let mut transport = ByteByByte {
            bytes: b"slow-stream".to_vec(),
            pos: 0,
        };
        let mut dst = BytesMut::new();
        transport.receive_bytes(&mut dst, 11).unwrap();
        assert_eq!(dst.as_ref(), b"slow-stream");
    }

    #[test]
    fn interrupted_read_retries() {
        let mut transport = InterruptedOnce {
            interrupted: false,
            inner: Loopback::with_bytes(b"ok"),
        };
        let mut dst = BytesMut::new();
        transport.receive_bytes(&mut dst, 2).unwrap();
        assert_eq!(dst.as_ref(), b"ok");
    }

    #[test]
    fn would_block_write_is_not_retried() {
        let mut transport = BlockedOnce {
            blocked: false,
            inner: Loopback::new(),
        };
        let err = transport.send_bytes(b"stall").unwrap_err();
        assert!(matches!(err, TransportError::Io(e) if e.kind() == ErrorKind::WouldBlock));
        assert_eq!(transport.inner.pending(), 0);
    }

    #[test]
    fn interrupted_write_retries() {
        let mut transport = InterruptedOnce {
            interrupted: false,
            inner: Loopback::new(),
        };
        transport.send_bytes(b"retry").unwrap();
        assert_eq!(transport.inner.drain_pending(), b"retry".to_vec());
    }

    #[test]
    fn read_error_propagates() {
        let mut transport = Broken;
        let mut dst = BytesMut::new();
        let err = transport.receive_bytes(&mut dst, 4).unwrap_err();
        assert!(matches!(err, TransportError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn write_error_propagates() {
        let mut transport = Broken;
        let err = transport.send_bytes(b"x").unwrap_err();
        assert!(matches!(err, TransportError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn zero_write_reports_connection_closed() {
        let mut transport = ZeroWriter;
        let err = transport.send_bytes(b"xyz").unwrap_err();
        assert!(matches!(
            err,
            TransportError::ConnectionClosed {
                expected: 3,
                received: 0
            }
        ));
    }

    #[test]
    fn send_flushes() {
        let flushed = Arc::new(AtomicBool::new(false));
        let mut transport = FlushTracking {
            flushed: Arc::clone(&flushed),
        };
        transport.send_bytes(b"x").unwrap();
        assert!(flushed.load(Ordering::SeqCst));
    }

    struct ByteByByte {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByte {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    impl Write for ByteByByte {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct InterruptedOnce {
        interrupted: bool,
        inner: Loopback,
    }

    impl Read for InterruptedOnce {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    impl Write for InterruptedOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BlockedOnce {
        blocked: bool,
        inner: Loopback,
    }

    impl Read for BlockedOnce {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Write for BlockedOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.blocked {
                self.blocked = true;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Read for ZeroWriter {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Ok(0)
        }
    }

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FlushTracking {
        flushed: Arc<AtomicBool>,
    }

    impl Read for FlushTracking {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Ok(0)
        }
    }

    impl Write for FlushTracking {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}
