//! Standard TCP ports robot controllers listen on.

/// Trajectory and motion commands.
pub const MOTION: u16 = 11000;

/// System-level requests.
pub const SYSTEM: u16 = 11001;

/// Joint position and robot status feedback.
pub const STATE: u16 = 11002;

/// Digital and analog I/O.
pub const IO: u16 = 11003;
