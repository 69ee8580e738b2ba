//! Bot protocol: one external process per player.
//!
//! Every bot is a child process talking newline-delimited JSON over its
//! stdin and stdout:
//! - [`process`] owns the child, the pipes and the escalating teardown
//! - [`protocol`] defines the wire messages and reply parsing
//! - [`actor`] runs the handshake and the per-turn exchange against a
//!   [`GameState`](crate::game::GameState)
//!
//! Only unix hosts are supported.

pub mod actor;
pub mod process;
pub mod protocol;

use std::time::Duration;

pub use actor::{ActorStats, BotActor, TurnOutcome};
pub use process::{BotProcess, ChannelState};

/// Default handshake timeout.
pub const INIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default soft turn timeout. Overruns are logged.
pub const SOFT_TIMEOUT: Duration = Duration::from_millis(100);

/// Default hard turn timeout. Overruns fault the channel.
pub const HARD_TIMEOUT: Duration = Duration::from_millis(500);

/// Reply deadlines for a bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Deadline for the handshake reply.
    pub init: Duration,
    /// Turn replies slower than this are logged.
    pub soft: Duration,
    /// Turn replies not complete by this deadline fault the channel.
    pub hard: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            init: INIT_TIMEOUT,
            soft: SOFT_TIMEOUT,
            hard: HARD_TIMEOUT,
        }
    }
}
