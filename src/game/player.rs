//! Player state management.

use std::collections::BTreeSet;

use crate::error::MoveError;
use crate::game::{Coord, Island};

/// Unique identifier for a player, 0-based in join order.
pub type PlayerId = u8;

/// State for a single player.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Current position on the island.
    pub position: Coord,
    /// Accumulated score. Never decreases.
    pub score: u64,
    /// Energy carried, spent on attacks.
    pub energy: u32,
    /// Lighthouses this player holds a key for.
    pub keys: BTreeSet<Coord>,
    /// Display name, replaced by the bot's greeting.
    pub name: String,
    /// Out of the match; scoring no longer credits this player.
    pub retired: bool,
}

impl Player {
    /// Create a new player at its start position.
    #[must_use]
    pub fn new(id: PlayerId, position: Coord) -> Self {
        Self {
            id,
            position,
            score: 0,
            energy: 0,
            keys: BTreeSet::new(),
            name: format!("Player {id}"),
            retired: false,
        }
    }

    /// Step one cell in any of the eight directions.
    ///
    /// # Errors
    ///
    /// Fails if the delta is not a unit step or the target cell is not part
    /// of the island. The player does not move on failure.
    pub fn step(&mut self, dx: i64, dy: i64, island: &Island) -> Result<(), MoveError> {
        let unit = |d: i64| (-1..=1).contains(&d);
        if !unit(dx) || !unit(dy) || (dx, dy) == (0, 0) {
            return Err(MoveError::NotAdjacent { dx, dy });
        }
        let target = self
            .position
            .offset(dx, dy)
            .filter(|&p| island.walkable(p))
            .ok_or(MoveError::NotWalkable)?;
        self.position = target;
        Ok(())
    }

    /// Grant the key of the lighthouse at `pos`.
    pub fn grant_key(&mut self, pos: Coord) {
        self.keys.insert(pos);
    }

    /// Whether this player holds the key of the lighthouse at `pos`.
    #[must_use]
    pub fn has_key(&self, pos: Coord) -> bool {
        self.keys.contains(&pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn island() -> Island {
        let rows: Vec<Vec<bool>> = (0..5)
            .map(|y| (0..5).map(|x| (1..4).contains(&x) && (1..4).contains(&y)).collect())
            .collect();
        Island::new(&rows).unwrap()
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new(1, Coord::new(2, 2));
        assert_eq!(player.id, 1);
        assert_eq!(player.position, Coord::new(2, 2));
        assert_eq!(player.score, 0);
        assert_eq!(player.name, "Player 1");
        assert!(player.keys.is_empty());
    }

    #[test]
    fn test_step_diagonal() {
        let island = island();
        let mut player = Player::new(0, Coord::new(2, 2));
        player.step(1, 1, &island).unwrap();
        assert_eq!(player.position, Coord::new(3, 3));
    }

    #[test]
    fn test_step_rejects_long_and_zero_deltas() {
        let island = island();
        let mut player = Player::new(0, Coord::new(2, 2));
        assert_eq!(
            player.step(2, 0, &island),
            Err(MoveError::NotAdjacent { dx: 2, dy: 0 })
        );
        assert!(player.step(0, 0, &island).is_err());
        assert_eq!(player.position, Coord::new(2, 2));
    }

    #[test]
    fn test_step_rejects_water() {
        let island = island();
        let mut player = Player::new(0, Coord::new(1, 1));
        assert_eq!(player.step(-1, 0, &island), Err(MoveError::NotWalkable));
        assert_eq!(player.position, Coord::new(1, 1));
    }

    #[test]
    fn test_keys() {
        let mut player = Player::new(0, Coord::new(1, 1));
        assert!(!player.has_key(Coord::new(1, 1)));
        player.grant_key(Coord::new(1, 1));
        assert!(player.has_key(Coord::new(1, 1)));
    }
}
