//! Error types for rule violations and bot communication faults.
//!
//! The two classes never mix: a [`MoveError`] is reported back to the bot
//! that issued the command and the match goes on, while a [`CommError`]
//! ends that bot's channel.

use std::fmt;
use std::io;
use std::time::Duration;

use crate::game::Coord;

/// A command that breaks the game rules.
///
/// Rejected commands never mutate the game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The command refers to a player that does not exist.
    UnknownPlayer(u8),
    /// Move delta is not one of the eight unit steps.
    NotAdjacent {
        /// Requested x delta.
        dx: i64,
        /// Requested y delta.
        dy: i64,
    },
    /// Move target is outside the island.
    NotWalkable,
    /// Attack issued away from a lighthouse.
    NotOnLighthouse,
    /// Attack strength below zero.
    NegativeStrength(i64),
    /// Connect issued away from the origin lighthouse.
    NotAtOrigin,
    /// Connect destination is not a lighthouse.
    UnknownLighthouse,
    /// One of the endpoints is not owned by the player.
    NotOwned,
    /// The player holds no key for the destination.
    MissingKey(Coord),
    /// Origin and destination are the same lighthouse.
    SelfConnection,
    /// The pair is already connected.
    AlreadyConnected,
    /// Another lighthouse lies on the segment.
    CrossesLighthouse(Coord),
    /// The segment crosses an existing connection.
    CrossesConnection,
    /// A command field is missing or has the wrong type.
    Malformed(&'static str),
    /// The command name is not recognized.
    UnknownCommand(String),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlayer(id) => write!(f, "Unknown player {id}"),
            Self::NotAdjacent { dx, dy } => {
                write!(f, "Delta ({dx}, {dy}) must be 1 cell away")
            }
            Self::NotWalkable => write!(f, "Target pos is not in island"),
            Self::NotOnLighthouse => write!(f, "Player must be located at target lighthouse"),
            Self::NegativeStrength(n) => write!(f, "Strength must be positive, got {n}"),
            Self::NotAtOrigin => write!(f, "Player must be located at the origin lighthouse"),
            Self::UnknownLighthouse => write!(f, "Destination must be an existing lighthouse"),
            Self::NotOwned => write!(f, "Both lighthouses must be player-owned"),
            Self::MissingKey(pos) => write!(f, "Player does not have the key for {pos}"),
            Self::SelfConnection => write!(f, "Cannot connect lighthouse to itself"),
            Self::AlreadyConnected => write!(f, "Connection already exists"),
            Self::CrossesLighthouse(pos) => {
                write!(f, "Connection cannot intersect a lighthouse ({pos})")
            }
            Self::CrossesConnection => {
                write!(f, "Connection cannot intersect another connection")
            }
            Self::Malformed(what) => write!(f, "{what}"),
            Self::UnknownCommand(name) => {
                write!(f, "Invalid command \"{}\"", name.escape_default())
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// A fault on the channel to a bot process.
///
/// Any of these ends the channel; the match runner decides whether the
/// whole match aborts.
#[derive(Debug)]
pub enum CommError {
    /// The bot process could not be started.
    Spawn(io::Error),
    /// Writing to the bot's stdin failed.
    Send(io::Error),
    /// Reading from the bot's stdout failed.
    Recv(io::Error),
    /// The bot closed its stdout.
    Closed,
    /// No complete line arrived before the hard deadline.
    HardTimeout {
        /// The deadline that was exceeded.
        limit: Duration,
    },
    /// The bot did not drain its input before the deadline.
    SendTimeout {
        /// The deadline that was exceeded.
        limit: Duration,
    },
    /// The reply line is not valid UTF-8 JSON.
    InvalidJson(String),
    /// The handshake reply had no string `name` field.
    BadGreeting,
    /// The turn reply is not an object with a `command` field.
    BadStructure,
    /// The channel already faulted or was closed.
    NotAlive,
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "Failed to start bot: {e}"),
            Self::Send(e) => write!(f, "Error sending data: {e}"),
            Self::Recv(e) => write!(f, "Error receiving data: {e}"),
            Self::Closed => write!(f, "Bot closed stdout"),
            Self::HardTimeout { limit } => {
                write!(f, "Bot over hard timeout ({}ms)", limit.as_millis())
            }
            Self::SendTimeout { limit } => {
                write!(f, "Bot stopped reading input ({}ms)", limit.as_millis())
            }
            Self::InvalidJson(e) => write!(f, "Invalid JSON: {e}"),
            Self::BadGreeting => write!(f, "Bot did not greet with name"),
            Self::BadStructure => write!(f, "Invalid command structure"),
            Self::NotAlive => write!(f, "Bot channel is not alive"),
        }
    }
}

impl std::error::Error for CommError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) | Self::Send(e) | Self::Recv(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_messages() {
        let err = MoveError::NotAdjacent { dx: 2, dy: 0 };
        assert_eq!(err.to_string(), "Delta (2, 0) must be 1 cell away");

        let err = MoveError::UnknownCommand("fly".to_string());
        assert_eq!(err.to_string(), "Invalid command \"fly\"");
    }

    #[test]
    fn test_comm_error_timeout_message() {
        let err = CommError::HardTimeout {
            limit: Duration::from_millis(500),
        };
        assert!(err.to_string().contains("500ms"));
    }

    #[test]
    fn test_comm_error_source() {
        use std::error::Error;

        let err = CommError::Send(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(err.source().is_some());
        assert!(CommError::Closed.source().is_none());
    }
}
