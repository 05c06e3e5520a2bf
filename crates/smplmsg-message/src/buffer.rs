use std::fmt;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{MessageError, Result};

/// A primitive value with a fixed wire width.
///
/// Multi-byte values are written little-endian.
pub trait WireValue: Sized + Copy {
    /// Width of the value on the wire, in bytes.
    const SIZE: usize;

    /// Append the encoded value to `dst`.
    fn put(self, dst: &mut BytesMut);

    /// Decode a value from exactly [`WireValue::SIZE`] bytes.
    fn get(src: &[u8]) -> Self;
}

macro_rules! wire_value {
    ($($ty:ty => $put:ident, $get:ident;)*) => {
        $(
            impl WireValue for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn put(self, dst: &mut BytesMut) {
                    dst.$put(self);
                }

                fn get(mut src: &[u8]) -> Self {
                    src.$get()
                }
            }
        )*
    };
}

wire_value! {
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u16 => put_u16_le, get_u16_le;
    i16 => put_i16_le, get_i16_le;
    u32 => put_u32_le, get_u32_le;
    i32 => put_i32_le, get_i32_le;
    u64 => put_u64_le, get_u64_le;
    i64 => put_i64_le, get_i64_le;
    f32 => put_f32_le, get_f32_le;
    f64 => put_f64_le, get_f64_le;
}

/// Growable byte container with a typed load/unload contract.
///
/// Loads always append to the tail. Unloads consume either from the tail
/// (`unload*`, last in first out) or from the front (`unload_front*`, in
/// arrival order). A failed operation leaves the buffer unchanged.
///
/// Cloning copies the bytes; two buffers never share storage.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    buf: BytesMut,
}

impl ByteBuffer {
    /// Hard cap on the number of bytes a buffer may hold.
    pub const MAX_SIZE: usize = 1024;

    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// Create a buffer holding a copy of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.load_bytes(bytes)?;
        Ok(buffer)
    }

    /// Reset to empty.
    pub fn init(&mut self) {
        self.buf.clear();
    }

    /// Number of meaningful bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Hard cap on the buffer size.
    pub fn max_size(&self) -> usize {
        Self::MAX_SIZE
    }

    /// Bytes that can still be loaded before the cap is reached.
    pub fn remaining_capacity(&self) -> usize {
        Self::MAX_SIZE - self.buf.len()
    }

    /// Borrow the raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Append a primitive value.
    pub fn load<T: WireValue>(&mut self, value: T) -> Result<()> {
        self.ensure_room(T::SIZE)?;
        value.put(&mut self.buf);
        Ok(())
    }

    /// Append a raw block of bytes.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_room(bytes.len())?;
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// Append the contents of another buffer.
    pub fn load_buffer(&mut self, other: &ByteBuffer) -> Result<()> {
        self.load_bytes(other.as_slice())
    }

    /// Remove the most recently loaded value of type `T` from the tail.
    pub fn unload<T: WireValue>(&mut self) -> Result<T> {
        self.ensure_available(T::SIZE)?;
        let tail = self.buf.split_off(self.buf.len() - T::SIZE);
        Ok(T::get(&tail))
    }

    /// Remove `dst.len()` bytes from the tail into `dst`.
    pub fn unload_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        self.ensure_available(dst.len())?;
        let tail = self.buf.split_off(self.buf.len() - dst.len());
        dst.copy_from_slice(&tail);
        Ok(())
    }

    /// Remove a value of type `T` from the front, shifting the rest forward.
    pub fn unload_front<T: WireValue>(&mut self) -> Result<T> {
        self.ensure_available(T::SIZE)?;
        let head = self.buf.split_to(T::SIZE);
        Ok(T::get(&head))
    }

    /// Remove `dst.len()` bytes from the front into `dst`.
    pub fn unload_front_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        self.ensure_available(dst.len())?;
        self.buf.copy_to_slice(dst);
        Ok(())
    }

    /// Remove `len` bytes from the front into a new buffer.
    pub fn unload_front_buffer(&mut self, len: usize) -> Result<ByteBuffer> {
        self.ensure_available(len)?;
        Ok(Self {
            buf: self.buf.split_to(len),
        })
    }

    /// Replace the contents with a copy of `other`.
    pub fn copy_from(&mut self, other: &ByteBuffer) {
        self.buf.clear();
        self.buf.extend_from_slice(&other.buf);
    }

    /// Append a copy of the contents to `dst`.
    pub fn copy_to(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.buf);
    }

    /// Run `op` against the buffer, restoring the previous contents if it fails.
    ///
    /// Used by multi-field payloads so a failure part way through a load or
    /// unload does not leave a half-written buffer behind.
    pub fn atomically<T, E>(
        &mut self,
        op: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let snapshot = self.buf.clone();
        let result = op(self);
        if result.is_err() {
            self.buf = snapshot;
        }
        result
    }

    fn ensure_room(&self, additional: usize) -> Result<()> {
        let size = self.buf.len() + additional;
        if size > Self::MAX_SIZE {
            return Err(MessageError::BufferFull {
                size,
                max: Self::MAX_SIZE,
            });
        }
        Ok(())
    }

    fn ensure_available(&self, needed: usize) -> Result<()> {
        if self.buf.len() < needed {
            return Err(MessageError::BufferTooShort {
                needed,
                available: self.buf.len(),
            });
        }
        Ok(())
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("len", &self.buf.len())
            .field("bytes", &format_args!("{:02x?}", self.buf.as_ref()))
            .finish()
    }
}
