//! Header code tables.
//!
//! Header fields are carried as raw integers so vendor-specific codes pass
//! through untouched; these modules name the standard values.

/// Standard message type codes.
///
/// Codes below 1000 are reserved for standard messages. Vendors own blocks of
/// [`msg_type::VENDOR_BLOCK_SIZE`] codes starting at the `*_MSG_BEGIN` values.
pub mod msg_type {
    pub const INVALID: u16 = 0;
    pub const PING: u16 = 1;

    pub const JOINT_POSITION: u16 = 10;
    /// Alias of [`JOINT_POSITION`].
    pub const JOINT: u16 = 10;
    /// Joint trajectory point, typically streamed.
    pub const JOINT_TRAJ_PT: u16 = 11;
    /// Whole joint trajectory, typically downloaded.
    pub const JOINT_TRAJ: u16 = 12;
    /// Robot status report.
    pub const STATUS: u16 = 13;
    /// Joint trajectory point with every field populated.
    pub const JOINT_TRAJ_PT_FULL: u16 = 14;
    /// Joint position/velocity/acceleration feedback.
    pub const JOINT_FEEDBACK: u16 = 15;

    pub const READ_INPUT: u16 = 20;
    pub const WRITE_OUTPUT: u16 = 21;

    pub const SWRI_MSG_BEGIN: u16 = 1000;
    pub const UR_MSG_BEGIN: u16 = 1100;
    pub const ADEPT_MSG_BEGIN: u16 = 1200;
    pub const ABB_MSG_BEGIN: u16 = 1300;
    pub const FANUC_MSG_BEGIN: u16 = 1400;
    pub const MOTOMAN_MSG_BEGIN: u16 = 2000;

    /// Number of codes reserved per vendor.
    pub const VENDOR_BLOCK_SIZE: u16 = 100;

    /// Returns a human-readable name for a message type code.
    pub fn name(code: u16) -> &'static str {
        match code {
            INVALID => "INVALID",
            PING => "PING",
            JOINT_POSITION => "JOINT_POSITION",
            JOINT_TRAJ_PT => "JOINT_TRAJ_PT",
            JOINT_TRAJ => "JOINT_TRAJ",
            STATUS => "STATUS",
            JOINT_TRAJ_PT_FULL => "JOINT_TRAJ_PT_FULL",
            JOINT_FEEDBACK => "JOINT_FEEDBACK",
            READ_INPUT => "READ_INPUT",
            WRITE_OUTPUT => "WRITE_OUTPUT",
            1000..=1099 => "SWRI",
            1100..=1199 => "UR",
            1200..=1299 => "ADEPT",
            1300..=1399 => "ABB",
            1400..=1499 => "FANUC",
            2000..=2099 => "MOTOMAN",
            _ => "UNKNOWN",
        }
    }

    /// Returns true if the code falls inside a reserved vendor block.
    pub fn is_vendor(code: u16) -> bool {
        [
            SWRI_MSG_BEGIN,
            UR_MSG_BEGIN,
            ADEPT_MSG_BEGIN,
            ABB_MSG_BEGIN,
            FANUC_MSG_BEGIN,
            MOTOMAN_MSG_BEGIN,
        ]
        .iter()
        .any(|begin| (*begin..*begin + VENDOR_BLOCK_SIZE).contains(&code))
    }
}

/// Communication type codes.
pub mod comm_type {
    pub const INVALID: u8 = 0;
    /// One-way message, no reply expected.
    pub const TOPIC: u8 = 1;
    pub const SERVICE_REQUEST: u8 = 2;
    pub const SERVICE_REPLY: u8 = 3;

    /// Returns a human-readable name for a comm type code.
    pub fn name(code: u8) -> &'static str {
        match code {
            INVALID => "INVALID",
            TOPIC => "TOPIC",
            SERVICE_REQUEST => "SERVICE_REQUEST",
            SERVICE_REPLY => "SERVICE_REPLY",
            _ => "UNKNOWN",
        }
    }
}

/// Reply codes, meaningful only on service replies.
pub mod reply_code {
    pub const INVALID: u8 = 0;
    pub const SUCCESS: u8 = 1;
    pub const FAILURE: u8 = 2;

    /// Returns a human-readable name for a reply code.
    pub fn name(code: u8) -> &'static str {
        match code {
            INVALID => "INVALID",
            SUCCESS => "SUCCESS",
            FAILURE => "FAILURE",
            _ => "UNKNOWN",
        }
    }
}
