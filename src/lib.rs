// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Lighthouses: a territory-control game engine for external bots.
//!
//! Bots capture lighthouses, link them and score the triangles the links
//! close. Each bot is an external process speaking newline-delimited JSON.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Arena (match runner)           │
//! ├─────────────────────────────────────┤
//! │  Bot protocol (process + actor)     │
//! ├─────────────────────────────────────┤
//! │         Game Logic                  │
//! ├─────────────────────────────────────┤
//! │         Geometry                    │
//! └─────────────────────────────────────┘
//! ```

pub mod arena;
pub mod bot;
pub mod error;
pub mod game;
pub mod geom;

pub use error::{CommError, MoveError};

// Re-export key game types at crate root for convenience
pub use arena::{Arena, FaultPolicy, MatchConfig, MatchError, MatchResult, run_match};
pub use bot::Timeouts;
pub use game::{Command, Coord, GameSnapshot, GameState, MapConfig, Player, PlayerId};
