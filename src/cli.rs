//! CLI command implementations for Lighthouses.

pub(crate) mod run;
pub(crate) mod validate;
pub(crate) mod watch;

mod output;

use clap::{Args, ValueEnum};
use lighthouses::arena::{DEFAULT_ROUNDS, FaultPolicy, MatchConfig, MatchError};
use lighthouses::bot::Timeouts;
use lighthouses::game::MapError;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// What to do when a bot breaks the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OnFault {
    /// Stop the match with an error.
    Abort,
    /// The bot passes for the rest of the match.
    Forfeit,
}

impl From<OnFault> for FaultPolicy {
    fn from(value: OnFault) -> Self {
        match value {
            OnFault::Abort => Self::Abort,
            OnFault::Forfeit => Self::Forfeit,
        }
    }
}

/// Match options shared by `run` and `watch`.
#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct MatchArgs {
    /// Rounds to play (default: 1000)
    #[arg(short, long, default_value_t = DEFAULT_ROUNDS)]
    rounds: u32,

    /// Reaction to a bot protocol fault
    #[arg(long, value_enum, default_value = "abort")]
    on_fault: OnFault,

    /// Handshake timeout in milliseconds
    #[arg(long, default_value = "2000")]
    init_timeout_ms: u64,

    /// Turn reply time after which a warning is logged
    #[arg(long, default_value = "100")]
    soft_timeout_ms: u64,

    /// Turn reply time after which the bot is cut off
    #[arg(long, default_value = "500")]
    hard_timeout_ms: u64,
}

impl MatchArgs {
    /// Build the match configuration.
    pub(crate) fn config(self) -> MatchConfig {
        MatchConfig {
            rounds: self.rounds,
            fault_policy: self.on_fault.into(),
            timeouts: Timeouts {
                init: Duration::from_millis(self.init_timeout_ms),
                soft: Duration::from_millis(self.soft_timeout_ms),
                hard: Duration::from_millis(self.hard_timeout_ms),
            },
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<MatchError> for CliError {
    fn from(e: MatchError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load a map, naming the file in the error.
pub(crate) fn load_map(path: &Path) -> Result<lighthouses::MapConfig, CliError> {
    lighthouses::MapConfig::load(path)
        .map_err(|e: MapError| CliError::new(format!("{}: {e}", path.display())))
}
