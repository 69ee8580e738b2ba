//! Commands a player can issue on its turn.

use crate::game::Coord;

/// A single turn command, already checked for shape.
///
/// Rule checks happen when the command is applied to the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Do nothing this turn.
    Pass,
    /// Step to a neighboring cell.
    Move {
        /// X delta, one of -1, 0, 1.
        dx: i64,
        /// Y delta, one of -1, 0, 1.
        dy: i64,
    },
    /// Spend energy on the lighthouse the player stands on.
    Attack {
        /// Energy to spend, clamped to what the player carries.
        energy: i64,
    },
    /// Link the lighthouse the player stands on to another one.
    Connect {
        /// The lighthouse to link to.
        destination: Coord,
    },
}

impl Command {
    /// Protocol name of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Move { .. } => "move",
            Self::Attack { .. } => "attack",
            Self::Connect { .. } => "connect",
        }
    }
}
