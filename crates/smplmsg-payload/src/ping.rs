use smplmsg_message::{ByteBuffer, Serializable};

/// Connection check. Carries no payload; the reply echoes the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ping;

impl Serializable for Ping {
    fn load(&self, _buffer: &mut ByteBuffer) -> smplmsg_message::Result<()> {
        Ok(())
    }

    fn unload(&mut self, _buffer: &mut ByteBuffer) -> smplmsg_message::Result<()> {
        Ok(())
    }

    fn byte_length(&self) -> usize {
        0
    }
}
