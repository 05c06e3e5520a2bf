use std::fmt;

use smplmsg_message::{ByteBuffer, Serializable};

/// Three-valued status flag carried as an i32.
///
/// The named constants are aliases over two concrete values: every "true"
/// spelling is 1 and every "false" spelling is 0. Values outside the known
/// set are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriState(i32);

impl TriState {
    pub const UNKNOWN: Self = Self(-1);

    pub const TRUE: Self = Self(1);
    pub const ON: Self = Self(1);
    pub const ENABLED: Self = Self(1);
    pub const HIGH: Self = Self(1);

    pub const FALSE: Self = Self(0);
    pub const OFF: Self = Self(0);
    pub const DISABLED: Self = Self(0);
    pub const LOW: Self = Self(0);

    pub const fn from_i32(value: i32) -> Self {
        Self(value)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// `Some(true)` / `Some(false)` for the known states, `None` otherwise.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::TRUE => Some(true),
            Self::FALSE => Some(false),
            _ => None,
        }
    }
}

impl Default for TriState {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::TRUE => f.write_str("TRUE"),
            Self::FALSE => f.write_str("FALSE"),
            Self::UNKNOWN => f.write_str("UNKNOWN"),
            Self(other) => write!(f, "INVALID({other})"),
        }
    }
}

/// Controller operating mode carried as an i32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RobotMode(i32);

impl RobotMode {
    pub const UNKNOWN: Self = Self(-1);
    /// Teach mode, typically with reduced speed.
    pub const MANUAL: Self = Self(1);
    pub const AUTO: Self = Self(2);

    pub const fn from_i32(value: i32) -> Self {
        Self(value)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl Default for RobotMode {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for RobotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MANUAL => f.write_str("MANUAL"),
            Self::AUTO => f.write_str("AUTO"),
            Self::UNKNOWN => f.write_str("UNKNOWN"),
            Self(other) => write!(f, "INVALID({other})"),
        }
    }
}

/// Controller state report.
///
/// Wire layout: seven i32 fields in the order drives powered, e-stopped,
/// error code, in error, in motion, mode, motion possible (28 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RobotStatus {
    drives_powered: TriState,
    e_stopped: TriState,
    error_code: i32,
    in_error: TriState,
    in_motion: TriState,
    mode: RobotMode,
    motion_possible: TriState,
}

impl RobotStatus {
    /// Field count on the wire.
    const FIELD_COUNT: usize = 7;

    /// Everything unknown, error code 0.
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_fields(
        drives_powered: TriState,
        e_stopped: TriState,
        error_code: i32,
        in_error: TriState,
        in_motion: TriState,
        mode: RobotMode,
        motion_possible: TriState,
    ) -> Self {
        Self {
            drives_powered,
            e_stopped,
            error_code,
            in_error,
            in_motion,
            mode,
            motion_possible,
        }
    }

    /// Reset to everything unknown.
    pub fn init(&mut self) {
        *self = Self::default();
    }

    pub fn drives_powered(&self) -> TriState {
        self.drives_powered
    }

    pub fn set_drives_powered(&mut self, value: TriState) {
        self.drives_powered = value;
    }

    pub fn e_stopped(&self) -> TriState {
        self.e_stopped
    }

    pub fn set_e_stopped(&mut self, value: TriState) {
        self.e_stopped = value;
    }

    pub fn error_code(&self) -> i32 {
        self.error_code
    }

    pub fn set_error_code(&mut self, value: i32) {
        self.error_code = value;
    }

    pub fn in_error(&self) -> TriState {
        self.in_error
    }

    pub fn set_in_error(&mut self, value: TriState) {
        self.in_error = value;
    }

    pub fn in_motion(&self) -> TriState {
        self.in_motion
    }

    pub fn set_in_motion(&mut self, value: TriState) {
        self.in_motion = value;
    }

    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    pub fn set_mode(&mut self, value: RobotMode) {
        self.mode = value;
    }

    pub fn motion_possible(&self) -> TriState {
        self.motion_possible
    }

    pub fn set_motion_possible(&mut self, value: TriState) {
        self.motion_possible = value;
    }

    pub fn copy_from(&mut self, src: &RobotStatus) {
        *self = *src;
    }
}

impl Serializable for RobotStatus {
    fn load(&self, buffer: &mut ByteBuffer) -> smplmsg_message::Result<()> {
        buffer.atomically(|buffer| {
            buffer.load(self.drives_powered.as_i32())?;
            buffer.load(self.e_stopped.as_i32())?;
            buffer.load(self.error_code)?;
            buffer.load(self.in_error.as_i32())?;
            buffer.load(self.in_motion.as_i32())?;
            buffer.load(self.mode.as_i32())?;
            buffer.load(self.motion_possible.as_i32())
        })
    }

    fn unload(&mut self, buffer: &mut ByteBuffer) -> smplmsg_message::Result<()> {
        let decoded = buffer.atomically(|buffer| -> smplmsg_message::Result<RobotStatus> {
            let motion_possible = TriState(buffer.unload()?);
            let mode = RobotMode(buffer.unload()?);
            let in_motion = TriState(buffer.unload()?);
            let in_error = TriState(buffer.unload()?);
            let error_code = buffer.unload()?;
            let e_stopped = TriState(buffer.unload()?);
            let drives_powered = TriState(buffer.unload()?);
            Ok(RobotStatus {
                drives_powered,
                e_stopped,
                error_code,
                in_error,
                in_motion,
                mode,
                motion_possible,
            })
        })?;
        *self = decoded;
        Ok(())
    }

    fn byte_length(&self) -> usize {
        Self::FIELD_COUNT * std::mem::size_of::<i32>()
    }
}
