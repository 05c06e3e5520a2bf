use smplmsg_message::{ByteBuffer, Serializable};
use tracing::error;

use crate::error::{PayloadError, Result};

/// Number of joint slots carried by every joint payload.
pub const MAX_NUM_JOINTS: usize = 10;

/// Fixed-size array of joint values (positions, velocities, ...).
///
/// Always carries [`MAX_NUM_JOINTS`] slots; robots with fewer joints leave
/// the rest at zero. Wire layout: `MAX_NUM_JOINTS` × f32, no length prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointData {
    joints: [f32; MAX_NUM_JOINTS],
}

impl JointData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every joint.
    pub fn init(&mut self) {
        self.joints = [0.0; MAX_NUM_JOINTS];
    }

    /// Set one joint value. Out of range indices are rejected untouched.
    pub fn set_joint(&mut self, index: usize, value: f32) -> Result<()> {
        match self.joints.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => {
                error!(index, max = MAX_NUM_JOINTS, "joint index out of range");
                Err(PayloadError::JointIndexOutOfRange {
                    index,
                    max: MAX_NUM_JOINTS,
                })
            }
        }
    }

    /// Joint value at `index`, or `None` past the last slot.
    pub fn try_joint(&self, index: usize) -> Option<f32> {
        self.joints.get(index).copied()
    }

    /// Joint value at `index`; 0.0 past the last slot.
    pub fn joint(&self, index: usize) -> f32 {
        self.try_joint(index).unwrap_or(0.0)
    }

    /// All joint slots.
    pub fn joints(&self) -> &[f32; MAX_NUM_JOINTS] {
        &self.joints
    }

    pub fn max_num_joints(&self) -> usize {
        MAX_NUM_JOINTS
    }

    pub fn copy_from(&mut self, src: &JointData) {
        self.joints = src.joints;
    }
}

impl From<[f32; MAX_NUM_JOINTS]> for JointData {
    fn from(joints: [f32; MAX_NUM_JOINTS]) -> Self {
        Self { joints }
    }
}

impl Serializable for JointData {
    fn load(&self, buffer: &mut ByteBuffer) -> smplmsg_message::Result<()> {
        buffer.atomically(|buffer| {
            for value in self.joints {
                buffer.load(value)?;
            }
            Ok(())
        })
    }

    fn unload(&mut self, buffer: &mut ByteBuffer) -> smplmsg_message::Result<()> {
        let mut joints = [0.0f32; MAX_NUM_JOINTS];
        buffer.atomically(|buffer| -> smplmsg_message::Result<()> {
            for slot in joints.iter_mut().rev() {
                *slot = buffer.unload()?;
            }
            Ok(())
        })?;
        self.joints = joints;
        Ok(())
    }

    fn byte_length(&self) -> usize {
        MAX_NUM_JOINTS * std::mem::size_of::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> JointData {
        JointData::from([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0])
    }

    #[test]
    fn set_and_get_in_range() {
        let mut data = JointData::new();
        data.set_joint(0, 1.5).unwrap();
        data.set_joint(MAX_NUM_JOINTS - 1, -2.25).unwrap();
        assert_eq!(data.joint(0), 1.5);
        assert_eq!(data.joint(MAX_NUM_JOINTS - 1), -2.25);
        assert_eq!(data.try_joint(3), Some(0.0));
    }

    #[test]
    fn out_of_range_get_returns_zero() {
        let data = ramp();
        assert_eq!(data.joint(MAX_NUM_JOINTS), 0.0);
        assert_eq!(data.joint(usize::MAX), 0.0);
        assert_eq!(data.try_joint(MAX_NUM_JOINTS), None);
        assert_eq!(data, ramp());
    }

    #[test]
    fn out_of_range_set_is_rejected() {
        let mut data = ramp();
        let err = data.set_joint(MAX_NUM_JOINTS, 99.0).unwrap_err();
        assert_eq!(
            err,
            PayloadError::JointIndexOutOfRange {
                index: MAX_NUM_JOINTS,
                max: MAX_NUM_JOINTS
            }
        );
        assert_eq!(data, ramp());
    }

    #[test]
    fn init_zeroes_and_copy_from_copies() {
        let mut data = ramp();
        data.init();
        assert_eq!(data, JointData::new());

        data.copy_from(&ramp());
        assert_eq!(data, ramp());
        assert_eq!(data.max_num_joints(), 10);
    }

    #[test]
    fn load_appends_byte_length_bytes_in_index_order() {
        let data = ramp();
        let mut buffer = ByteBuffer::new();
        data.load(&mut buffer).unwrap();

        assert_eq!(data.byte_length(), 40);
        assert_eq!(buffer.len(), data.byte_length());
        assert_eq!(&buffer.as_slice()[..4], &1.0f32.to_le_bytes());
        assert_eq!(&buffer.as_slice()[36..], &10.0f32.to_le_bytes());
    }

    #[test]
    fn unload_recovers_loaded_value() {
        let data = ramp();
        let mut buffer = ByteBuffer::new();
        data.load(&mut buffer).unwrap();

        let mut decoded = JointData::new();
        decoded.unload(&mut buffer).unwrap();
        assert_eq!(decoded, data);
        assert!(buffer.is_empty());
    }

    #[test]
    fn short_unload_leaves_both_sides_untouched() {
        let mut buffer = ByteBuffer::from_slice(&[0u8; 39]).unwrap();
        let mut decoded = ramp();
        assert!(decoded.unload(&mut buffer).is_err());
        assert_eq!(decoded, ramp());
        assert_eq!(buffer.len(), 39);
    }

    #[test]
    fn load_into_full_buffer_writes_nothing() {
        let mut buffer = ByteBuffer::from_slice(&[0u8; ByteBuffer::MAX_SIZE - 20]).unwrap();
        assert!(ramp().load(&mut buffer).is_err());
        assert_eq!(buffer.len(), ByteBuffer::MAX_SIZE - 20);
    }
}
