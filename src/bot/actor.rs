//! Bridges one player to its bot process.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::bot::protocol::{self, InitRequest, TurnRequest, TurnResult};
use crate::bot::{BotProcess, Timeouts};
use crate::error::{CommError, MoveError};
use crate::game::{Command, GameState, PlayerId};

/// Per-actor counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorStats {
    /// Turns answered.
    pub turns: u32,
    /// Replies slower than the soft timeout.
    pub soft_timeouts: u32,
    /// Commands rejected by the game rules.
    pub rejected_moves: u32,
}

/// What happened on one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The command was applied.
    Applied(Command),
    /// The command broke a rule and was reported back to the bot.
    Rejected(MoveError),
    /// The channel is down; the player passes.
    Inactive,
}

/// One player's bot.
#[derive(Debug)]
pub struct BotActor {
    id: PlayerId,
    name: String,
    process: BotProcess,
    timeouts: Timeouts,
    stats: ActorStats,
}

impl BotActor {
    /// Start the bot for player `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CommError::Spawn`] if the process cannot be started.
    pub fn spawn(id: PlayerId, cmdline: &str, timeouts: Timeouts) -> Result<Self, CommError> {
        let process = BotProcess::spawn(cmdline)?;
        debug!(player = id, pid = process.id(), cmdline, "bot started");
        Ok(Self {
            id,
            name: format!("Player {id}"),
            process,
            timeouts,
            stats: ActorStats::default(),
        })
    }

    /// Player this actor plays for.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Name from the greeting, or the default player name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> ActorStats {
        self.stats
    }

    /// Whether the channel can still carry turns.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.process.is_alive()
    }

    /// Send the handshake and record the bot's name on its player.
    ///
    /// # Errors
    ///
    /// Any failure faults the channel: timeout, broken pipe, invalid JSON or
    /// a reply without a string `name`.
    pub fn initialize(&mut self, state: &mut GameState) -> Result<(), CommError> {
        let Some(player) = state.player(self.id) else {
            return Err(CommError::NotAlive);
        };
        let request = InitRequest::new(state, player);

        let name = self
            .exchange(&request, self.timeouts.init)
            .and_then(|(reply, _)| protocol::parse_greeting(&reply));
        let name = self.check(name)?;

        info!(player = self.id, name = %name, "bot joined");
        if let Some(player) = state.players.get_mut(usize::from(self.id)) {
            player.name.clone_from(&name);
        }
        self.name = name;
        Ok(())
    }

    /// Play one turn: send the view, apply the reply, report the result.
    ///
    /// Rule violations are reported to the bot and returned as
    /// [`TurnOutcome::Rejected`]. A dead channel plays
    /// [`TurnOutcome::Inactive`].
    ///
    /// # Errors
    ///
    /// Protocol faults fault the channel and are returned.
    pub fn turn(&mut self, state: &mut GameState) -> Result<TurnOutcome, CommError> {
        if !self.is_alive() {
            return Ok(TurnOutcome::Inactive);
        }
        let Some(player) = state.player(self.id) else {
            return Ok(TurnOutcome::Inactive);
        };
        let request = TurnRequest::new(state, player);

        let reply = self.exchange(&request, self.timeouts.hard);
        let (reply, elapsed) = self.check(reply)?;
        self.stats.turns += 1;
        if elapsed > self.timeouts.soft {
            self.stats.soft_timeouts += 1;
            warn!(
                player = self.id,
                name = %self.name,
                elapsed_ms = elapsed.as_millis(),
                "bot over soft timeout"
            );
        }

        let object = protocol::command_object(&reply);
        let object = self.check(object)?;
        let applied =
            protocol::parse_command(object).and_then(|cmd| state.apply(self.id, cmd).map(|()| cmd));

        let (result, outcome) = match applied {
            Ok(cmd) => (TurnResult::accepted(), TurnOutcome::Applied(cmd)),
            Err(err) => {
                self.stats.rejected_moves += 1;
                debug!(player = self.id, name = %self.name, error = %err, "move rejected");
                (TurnResult::rejected(&err), TurnOutcome::Rejected(err))
            }
        };
        let line = protocol::encode(&result)?;
        let sent = self.process.send_line(&line, self.timeouts.hard);
        self.check(sent)?;
        Ok(outcome)
    }

    /// Stop the bot process and report its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be signalled or reaped.
    pub fn close(&mut self) -> io::Result<ExitStatus> {
        let status = self.process.close()?;
        info!(player = self.id, name = %self.name, %status, "bot exited");
        Ok(status)
    }

    fn exchange<T: serde::Serialize>(
        &mut self,
        request: &T,
        deadline: Duration,
    ) -> Result<(serde_json::Value, Duration), CommError> {
        let line = protocol::encode(request)?;
        self.process.send_line(&line, deadline)?;
        let (reply, elapsed) = self.process.recv_line(deadline)?;
        Ok((protocol::decode(&reply)?, elapsed))
    }

    /// Fault the channel on any error.
    fn check<T>(&mut self, result: Result<T, CommError>) -> Result<T, CommError> {
        result.map_err(|err| {
            self.process.mark_faulted();
            warn!(player = self.id, name = %self.name, error = %err, "bot channel fault");
            err
        })
    }
}
