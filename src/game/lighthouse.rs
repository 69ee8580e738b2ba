//! Lighthouses, the connections between them and the triangles they close.

use serde::Serialize;

use crate::game::{Coord, PlayerId};

/// Energy every lighthouse loses at the start of each round.
pub const LIGHTHOUSE_DECAY: u32 = 10;

/// A lighthouse on the island.
///
/// `energy == 0` exactly when `owner` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lighthouse {
    /// Position on the map; also the lighthouse's identity.
    pub position: Coord,
    /// Owning player, if any.
    pub owner: Option<PlayerId>,
    /// Stored energy.
    pub energy: u32,
}

impl Lighthouse {
    /// Create a neutral lighthouse.
    #[must_use]
    pub const fn new(position: Coord) -> Self {
        Self {
            position,
            owner: None,
            energy: 0,
        }
    }

    /// Remove up to `amount` energy.
    ///
    /// Returns `true` when the lighthouse is left empty, in which case it has
    /// also lost its owner. The caller must then drop every connection and
    /// triangle touching it.
    #[must_use]
    pub fn drain(&mut self, amount: u32) -> bool {
        self.energy = self.energy.saturating_sub(amount);
        if self.energy == 0 {
            self.owner = None;
            true
        } else {
            false
        }
    }

    /// Add energy on behalf of `player`, taking ownership.
    ///
    /// Only valid on a neutral lighthouse or one already owned by `player`.
    pub fn charge(&mut self, player: PlayerId, amount: u32) {
        debug_assert!(self.owner.is_none() || self.owner == Some(player));
        if amount > 0 {
            self.owner = Some(player);
            self.energy = self.energy.saturating_add(amount);
        }
    }
}

/// An unordered link between two distinct lighthouses.
///
/// Endpoints are stored sorted so equal pairs compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Connection {
    a: Coord,
    b: Coord,
}

impl Connection {
    /// Create a connection; `None` for a self pair.
    #[must_use]
    pub fn new(p: Coord, q: Coord) -> Option<Self> {
        match p.cmp(&q) {
            std::cmp::Ordering::Less => Some(Self { a: p, b: q }),
            std::cmp::Ordering::Greater => Some(Self { a: q, b: p }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Both endpoints, lower coordinate first.
    #[must_use]
    pub const fn endpoints(&self) -> (Coord, Coord) {
        (self.a, self.b)
    }

    /// Whether `pos` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, pos: Coord) -> bool {
        self.a == pos || self.b == pos
    }

    /// The endpoint opposite `pos`, if `pos` is an endpoint.
    #[must_use]
    pub fn other(&self, pos: Coord) -> Option<Coord> {
        if self.a == pos {
            Some(self.b)
        } else if self.b == pos {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Three mutually connected lighthouses.
///
/// `vertices[0]` is the origin of the connection that closed the triangle;
/// its owner scores the interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Triangle {
    /// Vertex positions, attribution vertex first.
    pub vertices: [Coord; 3],
}

impl Triangle {
    /// Create a triangle from its three vertices.
    #[must_use]
    pub const fn new(v0: Coord, v1: Coord, v2: Coord) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Whether `pos` is one of the vertices.
    #[must_use]
    pub fn touches(&self, pos: Coord) -> bool {
        self.vertices.contains(&pos)
    }

    /// The three edges as connections.
    #[must_use]
    pub fn edges(&self) -> [Option<Connection>; 3] {
        let [v0, v1, v2] = self.vertices;
        [
            Connection::new(v0, v1),
            Connection::new(v1, v2),
            Connection::new(v2, v0),
        ]
    }
}
