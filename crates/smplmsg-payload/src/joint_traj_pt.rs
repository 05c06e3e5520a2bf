use smplmsg_message::{ByteBuffer, Serializable};

use crate::joint_data::JointData;

/// Sequence values that signal trajectory control instead of a point index.
///
/// They are negative, but the sequence field is a u32 on the wire; the
/// conversion is a two's-complement reinterpretation in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SpecialSeqValue {
    /// Downloading drivers only: signal start of trajectory.
    StartTrajectoryDownload = -1,
    /// Streaming drivers only: signal start of trajectory.
    StartTrajectoryStreaming = -2,
    /// Downloading drivers only: signal end of trajectory.
    EndTrajectory = -3,
    /// Stop the current motion (if any) as soon as possible.
    StopTrajectory = -4,
}

impl SpecialSeqValue {
    /// Misspelled alias kept for controllers that still use it.
    #[deprecated(note = "use SpecialSeqValue::StartTrajectoryStreaming")]
    pub const START_TRAJECOTRY_STREAMING: Self = Self::StartTrajectoryStreaming;

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Value as written into the u32 sequence field.
    pub fn as_wire(self) -> u32 {
        self.as_i32() as u32
    }

    /// Interpret a wire sequence value, if it is one of the sentinels.
    pub fn from_wire(sequence: u32) -> Option<Self> {
        match sequence as i32 {
            -1 => Some(Self::StartTrajectoryDownload),
            -2 => Some(Self::StartTrajectoryStreaming),
            -3 => Some(Self::EndTrajectory),
            -4 => Some(Self::StopTrajectory),
            _ => None,
        }
    }
}

/// One point of a joint trajectory.
///
/// Wire layout, in order: sequence (u32), joint position (10 × f32),
/// velocity (f32), duration (f32), 52 bytes in all. [`Serializable::byte_length`]
/// reports 48: the duration field has never been counted, and receivers size
/// buffers from that value, so it is kept as is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointTrajPt {
    sequence: u32,
    joint_position: JointData,
    velocity: f32,
    duration: f32,
}

impl JointTrajPt {
    pub fn new(sequence: u32, joint_position: JointData, velocity: f32, duration: f32) -> Self {
        Self {
            sequence,
            joint_position,
            velocity,
            duration,
        }
    }

    /// Reset every field to zero.
    pub fn init(&mut self) {
        *self = Self::default();
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn set_sequence(&mut self, sequence: u32) {
        self.sequence = sequence;
    }

    /// The sentinel carried in the sequence field, if any.
    pub fn special_sequence(&self) -> Option<SpecialSeqValue> {
        SpecialSeqValue::from_wire(self.sequence)
    }

    pub fn set_special_sequence(&mut self, value: SpecialSeqValue) {
        self.sequence = value.as_wire();
    }

    pub fn joint_position(&self) -> &JointData {
        &self.joint_position
    }

    pub fn set_joint_position(&mut self, position: &JointData) {
        self.joint_position.copy_from(position);
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
    }

    pub fn copy_from(&mut self, src: &JointTrajPt) {
        *self = *src;
    }
}

impl Serializable for JointTrajPt {
    fn load(&self, buffer: &mut ByteBuffer) -> smplmsg_message::Result<()> {
        buffer.atomically(|buffer| {
            buffer.load(self.sequence)?;
            self.joint_position.load(buffer)?;
            buffer.load(self.velocity)?;
            buffer.load(self.duration)
        })
    }

    fn unload(&mut self, buffer: &mut ByteBuffer) -> smplmsg_message::Result<()> {
        let mut decoded = JointTrajPt::default();
        buffer.atomically(|buffer| -> smplmsg_message::Result<()> {
            decoded.duration = buffer.unload()?;
            decoded.velocity = buffer.unload()?;
            decoded.joint_position.unload(buffer)?;
            decoded.sequence = buffer.unload()?;
            Ok(())
        })?;
        *self = decoded;
        Ok(())
    }

    fn byte_length(&self) -> usize {
        std::mem::size_of::<f32>()
            + std::mem::size_of::<u32>()
            + self.joint_position.byte_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JointTrajPt {
        JointTrajPt::new(
            5,
            JointData::from([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]),
            0.5,
            2.0,
        )
    }

    #[test]
    fn byte_length_excludes_duration() {
        let point = sample();
        let mut buffer = ByteBuffer::new();
        point.load(&mut buffer).unwrap();

        assert_eq!(point.byte_length(), 48);
        assert_eq!(buffer.len(), 52);
        assert_eq!(buffer.len(), point.byte_length() + std::mem::size_of::<f32>());
    }

    #[test]
    fn wire_layout_order() {
        let mut buffer = ByteBuffer::new();
        sample().load(&mut buffer).unwrap();
        let bytes = buffer.as_slice();

        assert_eq!(&bytes[0..4], &5u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[40..44], &10.0f32.to_le_bytes());
        assert_eq!(&bytes[44..48], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[48..52], &2.0f32.to_le_bytes());
    }

    #[test]
    fn unload_recovers_every_field() {
        let point = sample();
        let mut buffer = ByteBuffer::new();
        point.load(&mut buffer).unwrap();

        let mut decoded = JointTrajPt::default();
        decoded.unload(&mut buffer).unwrap();
        assert_eq!(decoded, point);
        assert_eq!(decoded.duration(), 2.0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn buffer_sized_from_byte_length_loses_duration() {
        let point = sample();
        let mut buffer = ByteBuffer::new();
        point.load(&mut buffer).unwrap();

        // A receiver that trusts byte_length() takes only the first 48 bytes.
        let mut truncated = buffer.unload_front_buffer(point.byte_length()).unwrap();
        let mut decoded = JointTrajPt::default();
        assert!(decoded.unload(&mut truncated).is_err());
        assert_eq!(decoded, JointTrajPt::default());
        assert_eq!(truncated.len(), 48);
    }

    #[test]
    fn sentinels_roundtrip_through_unsigned_field() {
        let sentinels = [
            (SpecialSeqValue::StartTrajectoryDownload, u32::MAX),
            (SpecialSeqValue::StartTrajectoryStreaming, u32::MAX - 1),
            (SpecialSeqValue::EndTrajectory, u32::MAX - 2),
            (SpecialSeqValue::StopTrajectory, u32::MAX - 3),
        ];

        for (sentinel, wire) in sentinels {
            let mut point = sample();
            point.set_special_sequence(sentinel);
            assert_eq!(point.sequence(), wire);

            let mut buffer = ByteBuffer::new();
            point.load(&mut buffer).unwrap();
            let mut decoded = JointTrajPt::default();
            decoded.unload(&mut buffer).unwrap();

            assert_eq!(decoded.sequence() as i32, sentinel.as_i32());
            assert_eq!(decoded.special_sequence(), Some(sentinel));
        }
    }

    #[test]
    fn ordinary_sequence_is_not_a_sentinel() {
        assert_eq!(sample().special_sequence(), None);
        assert_eq!(SpecialSeqValue::from_wire(0), None);
        assert_eq!(SpecialSeqValue::from_wire(u32::MAX - 4), None);
    }

    #[test]
    #[allow(deprecated)]
    fn deprecated_streaming_alias_matches() {
        assert_eq!(
            SpecialSeqValue::START_TRAJECOTRY_STREAMING,
            SpecialSeqValue::StartTrajectoryStreaming
        );
        assert_eq!(SpecialSeqValue::START_TRAJECOTRY_STREAMING.as_i32(), -2);
    }

    #[test]
    fn accessors_and_copy() {
        let mut point = JointTrajPt::default();
        point.set_sequence(9);
        point.set_velocity(0.25);
        point.set_duration(1.5);
        let mut position = JointData::new();
        position.set_joint(2, 3.0).unwrap();
        point.set_joint_position(&position);

        assert_eq!(point.joint_position().joint(2), 3.0);

        let mut copy = JointTrajPt::default();
        copy.copy_from(&point);
        assert_eq!(copy, point);

        copy.init();
        assert_eq!(copy, JointTrajPt::default());
    }
}
