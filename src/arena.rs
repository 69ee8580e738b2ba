//! Match runner for Lighthouses games.
//!
//! Drives the round loop over a [`GameState`] and one [`BotActor`] per
//! player:
//! - spawn every bot and run the handshakes
//! - `pre_round`, one turn per player in id order, `post_round`
//! - apply the [`FaultPolicy`] when a bot channel breaks
//! - tear every bot down on all exit paths

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bot::{BotActor, Timeouts, TurnOutcome};
use crate::error::CommError;
use crate::game::invariants::assert_invariants;
use crate::game::{GameState, MapConfig, MapError, PlayerId};

/// Default number of rounds in a match.
pub const DEFAULT_ROUNDS: u32 = 1000;

/// What happens when a bot channel faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// End the match with an error.
    #[default]
    Abort,
    /// Keep playing without the faulted player. Its bot is stopped at once
    /// and its score stays frozen; its lighthouses remain on the board.
    Forfeit,
}

/// Configuration for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Rounds to play.
    pub rounds: u32,
    /// Reaction to bot channel faults.
    pub fault_policy: FaultPolicy,
    /// Reply deadlines.
    pub timeouts: Timeouts,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            fault_policy: FaultPolicy::default(),
            timeouts: Timeouts::default(),
        }
    }
}

/// Error type for match operations.
#[derive(Debug)]
pub enum MatchError {
    /// No bot commands were given.
    NoBots,
    /// The map cannot seat every bot.
    Map(MapError),
    /// A bot process could not be started.
    Spawn {
        /// Which player.
        player: PlayerId,
        /// Error details.
        error: CommError,
    },
    /// A bot channel faulted under [`FaultPolicy::Abort`].
    ActorFault {
        /// Which player.
        player: PlayerId,
        /// The bot's name.
        name: String,
        /// Round of the fault; `None` during the handshake.
        round: Option<u32>,
        /// Error details.
        error: CommError,
    },
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoBots => write!(f, "At least one bot is required"),
            Self::Map(e) => write!(f, "{e}"),
            Self::Spawn { player, error } => {
                write!(f, "Failed to start bot for player {player}: {error}")
            }
            Self::ActorFault {
                player,
                name,
                round,
                error,
            } => match round {
                Some(round) => write!(
                    f,
                    "Bot {name:?} (player {player}) faulted in round {round}: {error}"
                ),
                None => write!(
                    f,
                    "Bot {name:?} (player {player}) faulted during handshake: {error}"
                ),
            },
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoBots => None,
            Self::Map(e) => Some(e),
            Self::Spawn { error, .. } | Self::ActorFault { error, .. } => Some(error),
        }
    }
}

impl From<MapError> for MatchError {
    fn from(e: MapError) -> Self {
        Self::Map(e)
    }
}

/// One player's turn, as reported per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnSummary {
    /// A command was applied.
    Applied {
        /// Command name.
        command: &'static str,
    },
    /// A command broke a rule.
    Rejected {
        /// Rule message sent to the bot.
        message: String,
    },
    /// The player's channel was already down.
    Inactive,
    /// The channel faulted this turn.
    Faulted {
        /// Fault description.
        message: String,
    },
}

impl From<TurnOutcome> for TurnSummary {
    fn from(outcome: TurnOutcome) -> Self {
        match outcome {
            TurnOutcome::Applied(cmd) => Self::Applied {
                command: cmd.name(),
            },
            TurnOutcome::Rejected(err) => Self::Rejected {
                message: err.to_string(),
            },
            TurnOutcome::Inactive => Self::Inactive,
        }
    }
}

/// Per-player line of a round report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRound {
    /// Player id.
    pub id: PlayerId,
    /// Score after the round.
    pub score: u64,
    /// Points gained this round.
    pub gained: u64,
    /// What the player did.
    pub turn: TurnSummary,
}

/// Summary of one completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    /// Round number, starting at 0.
    pub round: u32,
    /// Players in id order.
    pub players: Vec<PlayerRound>,
}

/// Final statistics for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerResult {
    /// Player id.
    pub id: PlayerId,
    /// Bot name.
    pub name: String,
    /// Final score.
    pub score: u64,
    /// Round the channel faulted in. A failed handshake counts as round 0.
    pub faulted_round: Option<u32>,
    /// Replies slower than the soft timeout.
    pub soft_timeouts: u32,
    /// Commands rejected by the rules.
    pub rejected_moves: u32,
    /// Process exit code; `None` if killed by a signal.
    pub exit_code: Option<i32>,
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The player with the strictly highest score, if any.
    pub winner: Option<PlayerId>,
    /// Rounds played.
    pub rounds_played: u32,
    /// Per-player statistics.
    pub players: Vec<PlayerResult>,
}

/// A match in progress.
#[derive(Debug)]
pub struct Arena {
    state: GameState,
    actors: Vec<BotActor>,
    config: MatchConfig,
    faulted_round: Vec<Option<u32>>,
    exit_codes: Vec<Option<i32>>,
    closed: bool,
}

impl Arena {
    /// Seat one bot per command line on `map` and run the handshakes.
    ///
    /// # Errors
    ///
    /// Fails if there are no bots, the map has too few starts, a bot cannot
    /// be started, or a handshake fails under [`FaultPolicy::Abort`]. Bots
    /// already started are closed before returning.
    pub fn new(
        map: &MapConfig,
        cmdlines: &[String],
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        if cmdlines.is_empty() {
            return Err(MatchError::NoBots);
        }
        let state = GameState::new(map, cmdlines.len())?;

        let mut arena = Self {
            state,
            actors: Vec::with_capacity(cmdlines.len()),
            config,
            faulted_round: vec![None; cmdlines.len()],
            exit_codes: vec![None; cmdlines.len()],
            closed: false,
        };

        for (player, cmdline) in (0..).zip(cmdlines) {
            match BotActor::spawn(player, cmdline, config.timeouts) {
                Ok(actor) => arena.actors.push(actor),
                Err(error) => {
                    arena.close();
                    return Err(MatchError::Spawn { player, error });
                }
            }
        }

        for idx in 0..arena.actors.len() {
            let actor = &mut arena.actors[idx];
            if let Err(error) = actor.initialize(&mut arena.state) {
                let fault = MatchError::ActorFault {
                    player: actor.id(),
                    name: actor.name().to_owned(),
                    round: None,
                    error,
                };
                if let Err(e) = arena.forfeit_or_abort(idx, 0, fault) {
                    arena.close();
                    return Err(e);
                }
            }
        }
        assert_invariants(&arena.state);
        Ok(arena)
    }

    /// Current game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Match configuration.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Rounds played so far.
    #[must_use]
    pub const fn rounds_played(&self) -> u32 {
        self.state.round()
    }

    /// Whether every configured round has been played.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.state.round() >= self.config.rounds
    }

    /// Play one full round.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::ActorFault`] when a channel faults under
    /// [`FaultPolicy::Abort`]. The round is left unfinished; the caller
    /// still has to [`close`](Self::close) the arena.
    pub fn play_round(&mut self) -> Result<RoundReport, MatchError> {
        let round = self.state.round();
        self.state.pre_round();
        assert_invariants(&self.state);

        let mut turns = Vec::with_capacity(self.actors.len());
        for idx in 0..self.actors.len() {
            let actor = &mut self.actors[idx];
            let summary = match actor.turn(&mut self.state) {
                Ok(outcome) => TurnSummary::from(outcome),
                Err(error) => {
                    let message = error.to_string();
                    let fault = MatchError::ActorFault {
                        player: actor.id(),
                        name: actor.name().to_owned(),
                        round: Some(round),
                        error,
                    };
                    self.forfeit_or_abort(idx, round, fault)?;
                    TurnSummary::Faulted { message }
                }
            };
            turns.push(summary);
            assert_invariants(&self.state);
        }

        let gains = self.state.post_round();
        assert_invariants(&self.state);
        debug!(round, ?gains, "round complete");

        let players = self
            .state
            .players
            .iter()
            .zip(gains)
            .zip(turns)
            .map(|((player, gained), turn)| PlayerRound {
                id: player.id,
                score: player.score,
                gained,
                turn,
            })
            .collect();
        Ok(RoundReport { round, players })
    }

    fn forfeit_or_abort(
        &mut self,
        idx: usize,
        round: u32,
        fault: MatchError,
    ) -> Result<(), MatchError> {
        match self.config.fault_policy {
            FaultPolicy::Abort => Err(fault),
            FaultPolicy::Forfeit => {
                warn!(%fault, "player forfeits the rest of the match");
                self.faulted_round[idx] = Some(round);

                let actor = &mut self.actors[idx];
                if let Err(e) = self.state.retire(actor.id()) {
                    warn!(player = actor.id(), error = %e, "failed to retire player");
                }
                // Stop the process now; a dead channel never speaks again
                match actor.close() {
                    Ok(status) => self.exit_codes[idx] = status.code(),
                    Err(e) => warn!(player = actor.id(), error = %e, "failed to stop bot"),
                }
                Ok(())
            }
        }
    }

    /// Stop every bot process and return their exit codes in player order.
    /// `None` marks a bot killed by a signal or one that could not be
    /// reaped. Safe to call more than once.
    pub fn close(&mut self) -> &[Option<i32>] {
        if !self.closed {
            for (actor, code) in self.actors.iter_mut().zip(&mut self.exit_codes) {
                match actor.close() {
                    Ok(status) => *code = status.code(),
                    Err(e) => warn!(player = actor.id(), error = %e, "failed to stop bot"),
                }
            }
            self.closed = true;
        }
        &self.exit_codes
    }

    /// Final statistics.
    #[must_use]
    pub fn result(&self) -> MatchResult {
        let players: Vec<PlayerResult> = self
            .state
            .players
            .iter()
            .enumerate()
            .map(|(idx, player)| {
                let stats = self.actors.get(idx).map(BotActor::stats).unwrap_or_default();
                PlayerResult {
                    id: player.id,
                    name: player.name.clone(),
                    score: player.score,
                    faulted_round: self.faulted_round[idx],
                    soft_timeouts: stats.soft_timeouts,
                    rejected_moves: stats.rejected_moves,
                    exit_code: self.exit_codes[idx],
                }
            })
            .collect();

        let best = players.iter().map(|p| p.score).max();
        let mut leaders = players.iter().filter(|p| Some(p.score) == best);
        let winner = match (leaders.next(), leaders.next()) {
            (Some(p), None) => Some(p.id),
            _ => None,
        };

        MatchResult {
            winner,
            rounds_played: self.state.round(),
            players,
        }
    }
}

/// Play a complete match.
///
/// `on_round` sees every round report and the state after scoring. Bots are
/// closed on every path out of this function.
///
/// # Errors
///
/// Returns an error if the arena cannot be set up or a bot faults under
/// [`FaultPolicy::Abort`].
pub fn run_match<F>(
    map: &MapConfig,
    cmdlines: &[String],
    config: MatchConfig,
    mut on_round: F,
) -> Result<MatchResult, MatchError>
where
    F: FnMut(&RoundReport, &GameState),
{
    let mut arena = Arena::new(map, cmdlines, config)?;
    info!(bots = cmdlines.len(), rounds = config.rounds, "match started");

    while !arena.is_finished() {
        match arena.play_round() {
            Ok(report) => on_round(&report, arena.state()),
            Err(e) => {
                arena.close();
                return Err(e);
            }
        }
    }

    arena.close();
    let result = arena.result();
    info!(winner = ?result.winner, rounds = result.rounds_played, "match finished");
    Ok(result)
}
