//! Read-only copies of the game state for renderers.

use serde::Serialize;

use crate::game::{Connection, Coord, GameState, PlayerId};

/// Owned snapshot of everything a renderer draws.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    /// Completed rounds.
    pub round: u32,
    /// Grid width.
    pub width: u16,
    /// Grid height.
    pub height: u16,
    /// Walkable flags as `0`/`1`, bottom row first.
    pub island: Vec<Vec<u8>>,
    /// Cell energy, bottom row first.
    pub energy: Vec<Vec<u8>>,
    /// Players by id.
    pub players: Vec<PlayerSnapshot>,
    /// Lighthouses in coordinate order.
    pub lighthouses: Vec<LighthouseSnapshot>,
    /// Live connections.
    pub connections: Vec<Connection>,
    /// Live triangles.
    pub triangles: Vec<TriangleSnapshot>,
}

/// A player as seen by a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Current position.
    pub position: Coord,
    /// Accumulated score.
    pub score: u64,
    /// Carried energy.
    pub energy: u32,
    /// Keys held.
    pub keys: Vec<Coord>,
    /// Whether the player is out of the match.
    pub retired: bool,
}

/// A lighthouse as seen by a renderer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LighthouseSnapshot {
    /// Position.
    pub position: Coord,
    /// Owner, if any.
    pub owner: Option<PlayerId>,
    /// Stored energy.
    pub energy: u32,
}

/// A triangle and the player it scores for.
#[derive(Debug, Clone, Serialize)]
pub struct TriangleSnapshot {
    /// Vertices, attribution vertex first.
    pub vertices: [Coord; 3],
    /// Owner of the attribution vertex.
    pub owner: Option<PlayerId>,
    /// Interior cells.
    pub cells: Vec<Coord>,
}

impl GameSnapshot {
    /// Copy the drawable parts of `state`.
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        let owner_of = |pos: Coord| state.lighthouses.get(&pos).and_then(|lh| lh.owner);

        Self {
            round: state.round(),
            width: state.island.width(),
            height: state.island.height(),
            island: state.island.rows(),
            energy: state.island.energy_rows(),
            players: state
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id,
                    name: p.name.clone(),
                    position: p.position,
                    score: p.score,
                    energy: p.energy,
                    keys: p.keys.iter().copied().collect(),
                    retired: p.retired,
                })
                .collect(),
            lighthouses: state
                .lighthouses
                .values()
                .map(|lh| LighthouseSnapshot {
                    position: lh.position,
                    owner: lh.owner,
                    energy: lh.energy,
                })
                .collect(),
            connections: state.connections.iter().copied().collect(),
            triangles: state
                .triangles
                .iter()
                .map(|(tri, cells)| TriangleSnapshot {
                    vertices: tri.vertices,
                    owner: owner_of(tri.vertices[0]),
                    cells: cells.clone(),
                })
                .collect(),
        }
    }

    /// Owner of the triangle covering `pos`, if any.
    #[must_use]
    pub fn territory_owner(&self, pos: Coord) -> Option<PlayerId> {
        self.triangles
            .iter()
            .find(|t| t.cells.contains(&pos))
            .and_then(|t| t.owner)
    }

    /// Lighthouse at `pos`, if any.
    #[must_use]
    pub fn lighthouse_at(&self, pos: Coord) -> Option<&LighthouseSnapshot> {
        self.lighthouses.iter().find(|lh| lh.position == pos)
    }
}
