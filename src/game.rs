//! Game layer for Lighthouses.
//!
//! Implements the game rules:
//! - Island grid with a bounded energy field and a fog-of-war view
//! - Players collecting energy and lighthouse keys
//! - Lighthouses captured by attacks and drained by upkeep
//! - Connections and the triangles they close, scored every round

mod command;
pub mod invariants;
mod lighthouse;
mod map;
mod player;
mod snapshot;
mod state;

pub use command::Command;
pub use lighthouse::{Connection, LIGHTHOUSE_DECAY, Lighthouse, Triangle};
pub use map::{Coord, HORIZON, Island, MAX_ENERGY, MapConfig, MapError, UNKNOWN_ENERGY};
pub use player::{Player, PlayerId};
pub use snapshot::{GameSnapshot, LighthouseSnapshot, PlayerSnapshot, TriangleSnapshot};
pub use state::{CELL_POINTS, CONNECTION_POINTS, GameState, LIGHTHOUSE_POINTS, RDIST};
