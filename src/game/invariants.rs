//! Game invariants - sanity checks that detect bugs.
//!
//! No sequence of accepted commands can break these. A violation means the
//! engine itself is wrong.

use crate::game::{Connection, GameState, MAX_ENERGY};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut report = |message: String| violations.push(InvariantViolation { message });

    for cell in state.island.cells() {
        let energy = state.island.energy(cell);
        if energy > MAX_ENERGY {
            report(format!("Cell {cell} has energy {energy} > {MAX_ENERGY}"));
        }
    }

    for lh in state.lighthouses.values() {
        if (lh.energy == 0) != lh.owner.is_none() {
            report(format!(
                "Lighthouse {} has energy {} but owner {:?}",
                lh.position, lh.energy, lh.owner
            ));
        }
    }

    for conn in &state.connections {
        let (a, b) = conn.endpoints();
        let owners = (
            state.lighthouses.get(&a).map(|lh| lh.owner),
            state.lighthouses.get(&b).map(|lh| lh.owner),
        );
        match owners {
            (Some(Some(oa)), Some(Some(ob))) if oa == ob => {}
            _ => report(format!("Connection {a}-{b} has endpoints owned by {owners:?}")),
        }
    }

    for tri in state.triangles.keys() {
        for edge in tri.edges() {
            let linked = edge.is_some_and(|e: Connection| state.connections.contains(&e));
            if !linked {
                report(format!("Triangle {:?} has a missing edge", tri.vertices));
            }
        }
    }

    for player in &state.players {
        for key in &player.keys {
            if !state.lighthouses.contains_key(key) {
                report(format!("Player {} holds key {key} for no lighthouse", player.id));
            }
        }
        if !state.island.walkable(player.position) {
            report(format!(
                "Player {} stands off the island at {}",
                player.id, player.position
            ));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, MapConfig, Triangle};

    const MAP: &str = "\
#########
#!     !#
#       #
#   0   #
#       #
#!     !#
#########
";

    fn create_valid_game() -> GameState {
        let map = MapConfig::parse(MAP).unwrap();
        GameState::new(&map, 1).unwrap()
    }

    #[test]
    fn test_valid_game_passes() {
        let mut game = create_valid_game();
        assert!(check_invariants(&game).is_empty());
        game.pre_round();
        game.post_round();
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_owner_without_energy_detected() {
        let mut game = create_valid_game();
        game.lighthouses.get_mut(&Coord::new(1, 1)).unwrap().owner = Some(0);

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Lighthouse (1, 1)"));
    }

    #[test]
    fn test_energy_without_owner_detected() {
        let mut game = create_valid_game();
        game.lighthouses.get_mut(&Coord::new(1, 1)).unwrap().energy = 5;
        assert_eq!(check_invariants(&game).len(), 1);
    }

    #[test]
    fn test_dangling_connection_detected() {
        let mut game = create_valid_game();
        let conn = Connection::new(Coord::new(1, 1), Coord::new(7, 1)).unwrap();
        game.connections.insert(conn);

        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("Connection")));
    }

    #[test]
    fn test_triangle_missing_edge_detected() {
        let mut game = create_valid_game();
        for pos in [Coord::new(1, 1), Coord::new(7, 1), Coord::new(1, 5)] {
            let lh = game.lighthouses.get_mut(&pos).unwrap();
            lh.owner = Some(0);
            lh.energy = 20;
        }
        let tri = Triangle::new(Coord::new(1, 1), Coord::new(7, 1), Coord::new(1, 5));
        game.triangles.insert(tri, Vec::new());

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_unknown_key_detected() {
        let mut game = create_valid_game();
        game.players[0].keys.insert(Coord::new(3, 3));

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("key (3, 3)"));
    }

    #[test]
    #[should_panic(expected = "Game invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let mut game = create_valid_game();
        game.players[0].position = Coord::new(0, 0);
        assert_invariants(&game);
    }
}
