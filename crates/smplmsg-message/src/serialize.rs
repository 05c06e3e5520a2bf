use crate::buffer::ByteBuffer;
use crate::error::Result;

/// A payload with a fixed, type-specific wire layout.
///
/// `load` appends the fields to the buffer tail in layout order. `unload`
/// consumes them from the buffer tail, so it reads the fields back in reverse
/// layout order. A payload loaded onto a buffer is therefore recovered by the
/// next `unload` on that buffer.
pub trait Serializable {
    /// Append this value to `buffer`.
    fn load(&self, buffer: &mut ByteBuffer) -> Result<()>;

    /// Replace this value with one consumed from the tail of `buffer`.
    fn unload(&mut self, buffer: &mut ByteBuffer) -> Result<()>;

    /// Declared wire size in bytes.
    fn byte_length(&self) -> usize;
}
