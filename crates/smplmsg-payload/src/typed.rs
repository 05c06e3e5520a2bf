use smplmsg_message::{comm_type, msg_type, reply_code, ByteBuffer, Serializable, SimpleMessage};
use tracing::{debug, error};

use crate::error::{PayloadError, Result};
use crate::joint_data::JointData;
use crate::joint_traj_pt::JointTrajPt;
use crate::ping::Ping;
use crate::robot_status::RobotStatus;

/// Header version written by typed conversions.
const VERSION_MAJOR: u8 = 0;
const VERSION_MINOR: u8 = 0;

/// A payload bound to one message type code.
///
/// The provided methods build a [`SimpleMessage`] around the payload, or
/// decode the payload out of one after checking its type.
pub trait TypedMessage: Serializable + Default {
    /// Message type code this payload travels under.
    const MSG_TYPE: u16;

    /// Decode the payload of `message`.
    ///
    /// The message is left untouched; its payload is copied before unloading.
    fn from_message(message: &SimpleMessage) -> Result<Self> {
        if message.message_type() != Self::MSG_TYPE {
            error!(
                expected = Self::MSG_TYPE,
                received = message.message_type(),
                "message type mismatch"
            );
            return Err(PayloadError::WrongMessageType {
                expected: Self::MSG_TYPE,
                received: message.message_type(),
            });
        }

        let mut data = message.data().clone();
        let mut value = Self::default();
        value.unload(&mut data)?;
        if !data.is_empty() {
            debug!(
                message_type = Self::MSG_TYPE,
                leftover = data.len(),
                "payload longer than decoded value"
            );
        }
        Ok(value)
    }

    /// Wrap this payload in a message with the given comm type and reply code.
    fn to_message(&self, comm: u8, reply: u8) -> Result<SimpleMessage> {
        let mut data = ByteBuffer::new();
        self.load(&mut data)?;
        let mut message = SimpleMessage::new();
        message.init(Self::MSG_TYPE, VERSION_MAJOR, VERSION_MINOR, comm, reply, &data)?;
        Ok(message)
    }

    /// Message published without expecting a reply.
    fn to_topic(&self) -> Result<SimpleMessage> {
        self.to_message(comm_type::TOPIC, reply_code::INVALID)
    }

    /// Message that expects a reply.
    fn to_request(&self) -> Result<SimpleMessage> {
        self.to_message(comm_type::SERVICE_REQUEST, reply_code::INVALID)
    }

    /// Reply carrying this payload and `reply` as the result.
    fn to_reply(&self, reply: u8) -> Result<SimpleMessage> {
        self.to_message(comm_type::SERVICE_REPLY, reply)
    }
}

impl TypedMessage for Ping {
    const MSG_TYPE: u16 = msg_type::PING;
}

impl TypedMessage for JointData {
    const MSG_TYPE: u16 = msg_type::JOINT_POSITION;
}

impl TypedMessage for JointTrajPt {
    const MSG_TYPE: u16 = msg_type::JOINT_TRAJ_PT;
}

impl TypedMessage for RobotStatus {
    const MSG_TYPE: u16 = msg_type::STATUS;
}
