//! Wire messages exchanged with bots.
//!
//! One JSON object per line, requests and replies alternating:
//!
//! ```text
//! engine -> bot   init request        {"player_num", "player_count", "position", "map", "lighthouses"}
//! bot -> engine   greeting            {"name": "..."}
//! engine -> bot   turn request        {"position", "score", "energy", "view", "lighthouses"}
//! bot -> engine   command             {"command": "pass" | "move" | "attack" | "connect", ...}
//! engine -> bot   result              {"success": bool, "message"?: "..."}
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CommError, MoveError};
use crate::game::{Command, Coord, GameState, Player, PlayerId};

/// Handshake request sent once before the first round.
#[derive(Debug, Clone, Serialize)]
pub struct InitRequest {
    /// The receiving bot's player id.
    pub player_num: PlayerId,
    /// Number of players in the match.
    pub player_count: usize,
    /// Start position.
    pub position: Coord,
    /// Static island grid, `map[y][x]`, `1` for walkable.
    pub map: Vec<Vec<u8>>,
    /// Every lighthouse position.
    pub lighthouses: Vec<Coord>,
}

impl InitRequest {
    /// Build the handshake for `player`.
    #[must_use]
    pub fn new(state: &GameState, player: &Player) -> Self {
        Self {
            player_num: player.id,
            player_count: state.players.len(),
            position: player.position,
            map: state.island.rows(),
            lighthouses: state.lighthouses.keys().copied().collect(),
        }
    }
}

/// What a bot sees of one lighthouse.
#[derive(Debug, Clone, Serialize)]
pub struct LighthouseInfo {
    /// Position.
    pub position: Coord,
    /// Owner, `null` when neutral.
    pub owner: Option<PlayerId>,
    /// Stored energy.
    pub energy: u32,
    /// Lighthouses linked to this one.
    pub connections: Vec<Coord>,
    /// Whether the receiving player holds this lighthouse's key.
    pub have_key: bool,
}

/// Per-turn request.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRequest {
    /// Current position.
    pub position: Coord,
    /// Accumulated score.
    pub score: u64,
    /// Carried energy.
    pub energy: u32,
    /// Energy window around the player; `-1` beyond the horizon.
    pub view: Vec<Vec<i32>>,
    /// Every lighthouse.
    pub lighthouses: Vec<LighthouseInfo>,
}

impl TurnRequest {
    /// Build the turn request for `player`.
    #[must_use]
    pub fn new(state: &GameState, player: &Player) -> Self {
        let lighthouses = state
            .lighthouses
            .values()
            .map(|lh| LighthouseInfo {
                position: lh.position,
                owner: lh.owner,
                energy: lh.energy,
                connections: state.connections_of(lh.position),
                have_key: player.has_key(lh.position),
            })
            .collect();

        Self {
            position: player.position,
            score: player.score,
            energy: player.energy,
            view: state.island.view(player.position),
            lighthouses,
        }
    }
}

/// Outcome notice sent after every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnResult {
    /// Whether the command was applied.
    pub success: bool,
    /// Why it was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TurnResult {
    /// Result for an applied command.
    #[must_use]
    pub const fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Result for a rejected command.
    #[must_use]
    pub fn rejected(err: &MoveError) -> Self {
        Self {
            success: false,
            message: Some(err.to_string()),
        }
    }
}

/// Encode a message as one line of JSON.
///
/// # Errors
///
/// Returns [`CommError::InvalidJson`] if the message cannot be serialized.
pub fn encode<T: Serialize>(message: &T) -> Result<String, CommError> {
    serde_json::to_string(message).map_err(|e| CommError::InvalidJson(e.to_string()))
}

/// Parse a reply line.
///
/// # Errors
///
/// Returns [`CommError::InvalidJson`] if the line is not JSON.
pub fn decode(line: &str) -> Result<Value, CommError> {
    serde_json::from_str(line).map_err(|e| CommError::InvalidJson(e.to_string()))
}

/// Extract the bot name from a handshake reply.
///
/// # Errors
///
/// Returns [`CommError::BadGreeting`] unless the reply is an object with a
/// string `name`.
pub fn parse_greeting(reply: &Value) -> Result<String, CommError> {
    reply
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(CommError::BadGreeting)
}

/// Check that a turn reply is an object carrying a `command` field.
///
/// # Errors
///
/// Returns [`CommError::BadStructure`] otherwise.
pub fn command_object(reply: &Value) -> Result<&Map<String, Value>, CommError> {
    reply
        .as_object()
        .filter(|obj| obj.contains_key("command"))
        .ok_or(CommError::BadStructure)
}

/// Longest command name echoed back in a rejection.
const MAX_ECHO: usize = 32;

/// Turn a structurally valid reply into a command.
///
/// # Errors
///
/// Returns a [`MoveError`] for unknown commands and missing or ill-typed
/// fields. These are reported back to the bot.
pub fn parse_command(reply: &Map<String, Value>) -> Result<Command, MoveError> {
    let name = reply.get("command").unwrap_or(&Value::Null);
    match name.as_str() {
        Some("pass") => Ok(Command::Pass),
        Some("move") => {
            let delta = |key: &str| reply.get(key).and_then(Value::as_i64);
            match (delta("x"), delta("y")) {
                (Some(dx), Some(dy)) => Ok(Command::Move { dx, dy }),
                _ => Err(MoveError::Malformed("Move command requires x, y")),
            }
        }
        Some("attack") => reply
            .get("energy")
            .and_then(Value::as_i64)
            .map(|energy| Command::Attack { energy })
            .ok_or(MoveError::Malformed("Attack command requires integer energy")),
        Some("connect") => {
            let dest = reply
                .get("destination")
                .ok_or(MoveError::Malformed("Connect command requires destination"))?;
            let pair = dest
                .as_array()
                .filter(|items| items.len() == 2)
                .and_then(|items| Some((items[0].as_i64()?, items[1].as_i64()?)))
                .ok_or(MoveError::Malformed("Destination must be a coordinate pair"))?;
            let destination =
                Coord::from_signed(pair.0, pair.1).ok_or(MoveError::UnknownLighthouse)?;
            Ok(Command::Connect { destination })
        }
        Some(other) => Err(MoveError::UnknownCommand(echo(other))),
        None => Err(MoveError::UnknownCommand(echo(&name.to_string()))),
    }
}

/// Bot-supplied text, cut short for an error message.
fn echo(text: &str) -> String {
    text.chars().take(MAX_ECHO).collect()
}
