use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use smplmsg_connection::ConnectionError;
use smplmsg_payload::{RobotMode, SpecialSeqValue, TriState};
use smplmsg_transport::TransportError;

use crate::exit::{connection_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub mod listen;
pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept controller connections and print every received message.
    Listen(ListenArgs),
    /// Send a single message, optionally waiting for the reply.
    Send(SendArgs),
    /// Run a simulated controller that answers service requests.
    Serve(ServeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Serve(args) => serve::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Address to bind (e.g. 0.0.0.0:11002).
    pub addr: String,
    /// Exit after receiving N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageKind {
    Ping,
    Status,
    Joint,
    TrajPt,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TriStateArg {
    True,
    False,
    Unknown,
}

impl From<TriStateArg> for TriState {
    fn from(arg: TriStateArg) -> Self {
        match arg {
            TriStateArg::True => TriState::TRUE,
            TriStateArg::False => TriState::FALSE,
            TriStateArg::Unknown => TriState::UNKNOWN,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Manual,
    Auto,
    Unknown,
}

impl From<ModeArg> for RobotMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Manual => RobotMode::MANUAL,
            ModeArg::Auto => RobotMode::AUTO,
            ModeArg::Unknown => RobotMode::UNKNOWN,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SpecialArg {
    StartDownload,
    StartStreaming,
    End,
    Stop,
}

impl From<SpecialArg> for SpecialSeqValue {
    fn from(arg: SpecialArg) -> Self {
        match arg {
            SpecialArg::StartDownload => SpecialSeqValue::StartTrajectoryDownload,
            SpecialArg::StartStreaming => SpecialSeqValue::StartTrajectoryStreaming,
            SpecialArg::End => SpecialSeqValue::EndTrajectory,
            SpecialArg::Stop => SpecialSeqValue::StopTrajectory,
        }
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Controller address (e.g. 192.168.1.10:11000).
    pub addr: String,
    /// Payload type to send.
    #[arg(long = "type", value_enum, default_value = "ping")]
    pub kind: MessageKind,
    /// Send as a service request and print the reply.
    #[arg(long)]
    pub request: bool,
    /// Maximum time to wait for the reply (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub wait_timeout: String,
    /// Maximum time to spend connecting.
    #[arg(long, default_value = "5s")]
    pub connect_timeout: String,

    /// Joint values, comma-separated (joint and traj-pt).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub joints: Vec<f32>,
    /// Trajectory point sequence number (traj-pt).
    #[arg(long, default_value_t = 0)]
    pub sequence: u32,
    /// Trajectory control sentinel in place of a sequence number (traj-pt).
    #[arg(long, value_enum, conflicts_with = "sequence")]
    pub special: Option<SpecialArg>,
    /// Trajectory point velocity (traj-pt).
    #[arg(long, default_value_t = 0.0)]
    pub velocity: f32,
    /// Trajectory point duration in seconds (traj-pt).
    #[arg(long, default_value_t = 0.0)]
    pub duration: f32,

    /// Drives powered (status).
    #[arg(long, value_enum, default_value = "unknown")]
    pub drives_powered: TriStateArg,
    /// Emergency stop engaged (status).
    #[arg(long, value_enum, default_value = "unknown")]
    pub e_stopped: TriStateArg,
    /// Controller error code (status).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub error_code: i32,
    /// Controller in error (status).
    #[arg(long, value_enum, default_value = "unknown")]
    pub in_error: TriStateArg,
    /// Robot in motion (status).
    #[arg(long, value_enum, default_value = "unknown")]
    pub in_motion: TriStateArg,
    /// Operating mode (status).
    #[arg(long, value_enum, default_value = "unknown")]
    pub mode: ModeArg,
    /// Motion possible (status).
    #[arg(long, value_enum, default_value = "unknown")]
    pub motion_possible: TriStateArg,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (e.g. 127.0.0.1:11000).
    pub addr: String,
    /// Answer service requests with FAILURE instead of SUCCESS.
    #[arg(long)]
    pub fail: bool,
    /// Exit after handling N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

/// Decide what a receive error means for a controller session.
///
/// A hang-up or a protocol error ends the session (`Ok`); the stream cannot
/// be resynchronized, so the caller goes back to accepting. Anything else
/// is fatal for the command.
pub(crate) fn end_of_session(err: ConnectionError) -> CliResult<()> {
    match err {
        ConnectionError::Transport(TransportError::ConnectionClosed { received, .. }) => {
            tracing::debug!(partial_bytes = received, "controller disconnected");
            Ok(())
        }
        err @ (ConnectionError::InvalidStartTag { .. }
        | ConnectionError::InvalidEndTag { .. }
        | ConnectionError::PayloadTooLarge { .. }
        | ConnectionError::Message(_)) => {
            tracing::warn!(error = %err, "dropping connection after protocol error");
            Ok(())
        }
        other => Err(connection_error("receive failed", other)),
    }
}

/// Ctrl-C handling for the long-running accept loops.
///
/// The handler exits the process once no received message is being printed
/// or answered, so an idle `accept` or `receive` does not hold it up.
#[derive(Clone, Debug, Default)]
pub(crate) struct Shutdown {
    handling: Arc<Mutex<()>>,
}

impl Shutdown {
    pub(crate) fn install() -> CliResult<Self> {
        let shutdown = Self::default();
        let handler = shutdown.clone();
        ctrlc::set_handler(move || handler.interrupt()).map_err(|err| {
            CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
        })?;
        Ok(shutdown)
    }

    /// Hold while a received message is handled; an interrupt waits for it.
    pub(crate) fn handling(&self) -> MutexGuard<'_, ()> {
        self.handling.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn interrupt(&self) {
        let _idle = self.handling();
        tracing::info!("interrupted, shutting down");
        std::process::exit(SUCCESS);
    }
}
