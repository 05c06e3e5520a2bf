//! Typed payloads carried inside simple messages.
//!
//! Each payload has a fixed wire layout and implements
//! [`smplmsg_message::Serializable`]. [`TypedMessage`] binds a payload to its
//! message type code and converts it to and from a [`smplmsg_message::SimpleMessage`].

pub mod error;
pub mod joint_data;
pub mod joint_traj_pt;
pub mod ping;
pub mod robot_status;
pub mod typed;

pub use error::{PayloadError, Result};
pub use joint_data::{JointData, MAX_NUM_JOINTS};
pub use joint_traj_pt::{JointTrajPt, SpecialSeqValue};
pub use ping::Ping;
pub use robot_status::{RobotMode, RobotStatus, TriState};
pub use typed::TypedMessage;
