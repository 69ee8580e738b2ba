//! Game state management and the round phases.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::MoveError;
use crate::game::{
    Command, Connection, Coord, GameSnapshot, Island, LIGHTHOUSE_DECAY, Lighthouse, MapConfig,
    MapError, Player, PlayerId, Triangle,
};
use crate::geom;

/// Radius of the energy each lighthouse spreads over the island.
pub const RDIST: u16 = 5;

/// Points per owned lighthouse per round.
pub const LIGHTHOUSE_POINTS: u64 = 2;

/// Points per connection per round.
pub const CONNECTION_POINTS: u64 = 2;

/// Points per triangle interior cell per round.
pub const CELL_POINTS: u64 = 1;

/// Complete game state.
///
/// The only mutator of the island, lighthouses, connections, triangles and
/// players. Every rule check happens here.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The island grid and its energy field.
    pub island: Island,
    /// Lighthouses keyed by position.
    pub lighthouses: BTreeMap<Coord, Lighthouse>,
    /// Live connections.
    pub connections: BTreeSet<Connection>,
    /// Live triangles with their interior cells.
    pub triangles: BTreeMap<Triangle, Vec<Coord>>,
    /// Players, indexed by id.
    pub players: Vec<Player>,
    /// Completed rounds.
    round: u32,
}

impl GameState {
    /// Create a new game from a map, seating `player_count` players on the
    /// first start positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the map has fewer starts than players or its
    /// grid is unusable.
    pub fn new(map: &MapConfig, player_count: usize) -> Result<Self, MapError> {
        if player_count > map.players.len() || player_count > usize::from(PlayerId::MAX) {
            return Err(MapError::NotEnoughStarts {
                available: map.players.len(),
                requested: player_count,
            });
        }
        let island = Island::new(&map.island).ok_or(MapError::Ragged)?;

        let lighthouses = map
            .lighthouses
            .iter()
            .map(|&pos| (pos, Lighthouse::new(pos)))
            .collect();

        #[allow(clippy::cast_possible_truncation)]
        let players = map
            .players
            .iter()
            .take(player_count)
            .enumerate()
            .map(|(i, &pos)| Player::new(i as PlayerId, pos))
            .collect();

        Ok(Self {
            island,
            lighthouses,
            connections: BTreeSet::new(),
            triangles: BTreeMap::new(),
            players,
            round: 0,
        })
    }

    /// Number of completed rounds.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Get a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, MoveError> {
        self.players
            .get_mut(usize::from(id))
            .ok_or(MoveError::UnknownPlayer(id))
    }

    /// Take a player out of the match.
    ///
    /// Its lighthouses, connections and triangles stay on the board and
    /// decay as usual, but `post_round` no longer credits it, so its score
    /// is frozen from here on.
    ///
    /// # Errors
    ///
    /// Fails with [`MoveError::UnknownPlayer`] for an unknown id.
    pub fn retire(&mut self, id: PlayerId) -> Result<(), MoveError> {
        self.player_mut(id)?.retired = true;
        Ok(())
    }

    /// Lighthouses linked to the one at `pos`.
    #[must_use]
    pub fn connections_of(&self, pos: Coord) -> Vec<Coord> {
        self.connections.iter().filter_map(|c| c.other(pos)).collect()
    }

    /// Apply one player command.
    ///
    /// # Errors
    ///
    /// Returns the broken rule; the state is untouched in that case.
    pub fn apply(&mut self, id: PlayerId, command: Command) -> Result<(), MoveError> {
        match command {
            Command::Pass => self.player_mut(id).map(|_| ()),
            Command::Move { dx, dy } => self.move_player(id, dx, dy),
            Command::Attack { energy } => self.attack(id, energy),
            Command::Connect { destination } => {
                let origin = self.player_mut(id)?.position;
                self.connect(id, origin, destination)
            }
        }
    }

    /// Move a player one cell.
    ///
    /// # Errors
    ///
    /// Fails for non-unit deltas and targets off the island.
    pub fn move_player(&mut self, id: PlayerId, dx: i64, dy: i64) -> Result<(), MoveError> {
        let island = &self.island;
        let player = self
            .players
            .get_mut(usize::from(id))
            .ok_or(MoveError::UnknownPlayer(id))?;
        player.step(dx, dy, island)
    }

    /// Spend `strength` energy on the lighthouse the player stands on.
    ///
    /// The strength is clamped to the player's energy and always spent. An
    /// enemy lighthouse loses energy first; whatever is left over claims or
    /// reinforces the lighthouse for the attacker.
    ///
    /// # Errors
    ///
    /// Fails if the player is not on a lighthouse or `strength` is negative.
    pub fn attack(&mut self, id: PlayerId, strength: i64) -> Result<(), MoveError> {
        let player = self
            .players
            .get_mut(usize::from(id))
            .ok_or(MoveError::UnknownPlayer(id))?;
        let pos = player.position;
        let lighthouse = self
            .lighthouses
            .get_mut(&pos)
            .ok_or(MoveError::NotOnLighthouse)?;
        if strength < 0 {
            return Err(MoveError::NegativeStrength(strength));
        }

        let mut remaining = u32::try_from(strength)
            .unwrap_or(u32::MAX)
            .min(player.energy);
        player.energy -= remaining;

        let mut went_dark = false;
        if lighthouse.owner.is_some_and(|owner| owner != id) {
            let cancelled = lighthouse.energy.min(remaining);
            went_dark = lighthouse.drain(cancelled);
            remaining -= cancelled;
        }
        if remaining > 0 {
            lighthouse.charge(id, remaining);
        }

        if went_dark {
            self.sever(pos);
        }
        Ok(())
    }

    /// Drain energy from the lighthouse at `pos`.
    ///
    /// When the lighthouse empties, every connection and triangle touching
    /// it is removed before this returns. Returns whether that happened.
    pub fn decay(&mut self, pos: Coord, amount: u32) -> bool {
        let Some(lighthouse) = self.lighthouses.get_mut(&pos) else {
            return false;
        };
        let went_dark = lighthouse.drain(amount);
        if went_dark {
            self.sever(pos);
        }
        went_dark
    }

    /// Drop all connections and triangles touching `pos`.
    fn sever(&mut self, pos: Coord) {
        self.connections.retain(|c| !c.touches(pos));
        self.triangles.retain(|t, _| !t.touches(pos));
    }

    /// Connect the lighthouse at `origin` to the one at `dest`.
    ///
    /// The player must stand on `origin`, own both lighthouses and hold the
    /// key for `dest`. The segment may not pass through another lighthouse
    /// nor cross an existing connection. Every triangle the new link closes
    /// is created with `origin` as its attribution vertex.
    ///
    /// # Errors
    ///
    /// Returns the first rule the connection breaks.
    ///
    /// # Panics
    ///
    /// Panics if an owned endpoint has no energy.
    pub fn connect(&mut self, id: PlayerId, origin: Coord, dest: Coord) -> Result<(), MoveError> {
        let player = self.player(id).ok_or(MoveError::UnknownPlayer(id))?;
        if player.position != origin {
            return Err(MoveError::NotAtOrigin);
        }
        let orig_lh = self.lighthouses.get(&origin).ok_or(MoveError::NotAtOrigin)?;
        let dest_lh = self
            .lighthouses
            .get(&dest)
            .ok_or(MoveError::UnknownLighthouse)?;
        if orig_lh.owner != Some(id) || dest_lh.owner != Some(id) {
            return Err(MoveError::NotOwned);
        }
        if !player.has_key(dest) {
            return Err(MoveError::MissingKey(dest));
        }
        let pair = Connection::new(origin, dest).ok_or(MoveError::SelfConnection)?;
        if self.connections.contains(&pair) {
            return Err(MoveError::AlreadyConnected);
        }
        assert!(
            orig_lh.energy > 0 && dest_lh.energy > 0,
            "owned lighthouse without energy"
        );

        if let Some(&blocker) = self
            .lighthouses
            .keys()
            .find(|&&lh| lh != origin && lh != dest && geom::on_segment(origin, dest, lh))
        {
            return Err(MoveError::CrossesLighthouse(blocker));
        }

        let mut closed = Vec::new();
        for conn in &self.connections {
            if geom::intersect(conn.endpoints(), (origin, dest)) {
                return Err(MoveError::CrossesConnection);
            }
            if let Some(third) = conn.other(origin) {
                let closing = Connection::new(third, dest);
                if closing.is_some_and(|c| self.connections.contains(&c)) {
                    closed.push(Triangle::new(origin, dest, third));
                }
            }
        }

        self.player_mut(id)?.keys.remove(&dest);
        self.connections.insert(pair);
        for tri in closed {
            let cells = geom::render(tri.vertices)
                .into_iter()
                .filter(|&c| self.island.walkable(c))
                .collect();
            self.triangles.insert(tri, cells);
        }
        Ok(())
    }

    /// Start-of-round phase.
    ///
    /// Lighthouses spread energy over the island, players collect the
    /// energy of the cell they stand on (split evenly when sharing) and the
    /// key of the lighthouse they stand on, then every lighthouse decays.
    pub fn pre_round(&mut self) {
        let reach = i64::from(RDIST);
        for &pos in self.lighthouses.keys() {
            for dy in (1 - reach)..reach {
                for dx in (1 - reach)..reach {
                    let Some(cell) = pos.offset(dx, dy) else {
                        continue;
                    };
                    #[allow(clippy::cast_possible_truncation)]
                    let delta = (f64::from(RDIST) - geom::dist(pos, cell)).floor() as i64;
                    if delta > 0 {
                        self.island.add_energy(cell, delta);
                    }
                }
            }
        }

        let mut occupants: BTreeMap<Coord, Vec<usize>> = BTreeMap::new();
        for (idx, player) in self.players.iter_mut().enumerate() {
            occupants.entry(player.position).or_default().push(idx);
            if self.lighthouses.contains_key(&player.position) {
                player.grant_key(player.position);
            }
        }
        for (pos, idxs) in occupants {
            let count = u32::try_from(idxs.len()).unwrap_or(u32::MAX);
            let share = u32::from(self.island.energy(pos)) / count;
            for idx in idxs {
                let player = &mut self.players[idx];
                player.energy = player.energy.saturating_add(share);
            }
            self.island.set_energy(pos, 0);
        }

        let positions: Vec<Coord> = self.lighthouses.keys().copied().collect();
        for pos in positions {
            self.decay(pos, LIGHTHOUSE_DECAY);
        }
    }

    /// End-of-round scoring.
    ///
    /// Returns the points each player gained this round. Retired players
    /// gain nothing.
    ///
    /// # Panics
    ///
    /// Panics if a connection or triangle references an unowned lighthouse;
    /// decay removes those, so this is an internal consistency failure.
    pub fn post_round(&mut self) -> Vec<u64> {
        let mut gains = vec![0u64; self.players.len()];
        let owner_of = |pos: Coord| {
            self.lighthouses
                .get(&pos)
                .and_then(|lh| lh.owner)
                .map(usize::from)
        };

        for lighthouse in self.lighthouses.values() {
            if let Some(owner) = lighthouse.owner {
                gains[usize::from(owner)] += LIGHTHOUSE_POINTS;
            }
        }
        for conn in &self.connections {
            let (a, b) = conn.endpoints();
            let Some(owner) = owner_of(a) else {
                panic!("connection {a}-{b} has an unowned endpoint");
            };
            gains[owner] += CONNECTION_POINTS;
        }
        for (tri, cells) in &self.triangles {
            let v0 = tri.vertices[0];
            let Some(owner) = owner_of(v0) else {
                panic!("triangle vertex {v0} is unowned");
            };
            gains[owner] += CELL_POINTS * cells.len() as u64;
        }

        for (player, gain) in self.players.iter_mut().zip(&mut gains) {
            if player.retired {
                *gain = 0;
            }
            player.score += *gain;
        }
        self.round += 1;
        gains
    }

    /// Capture a read-only copy of the state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
############
#          #
#        ! #
#          #
#          #
# !        #
#    0     #
#    1     #
#    2     #
# !   !  ! #
#          #
############
";

    const A: Coord = Coord::new(2, 2);
    const B: Coord = Coord::new(6, 2);
    const C: Coord = Coord::new(2, 6);
    const D: Coord = Coord::new(9, 2);
    const E: Coord = Coord::new(9, 9);

    fn create_test_game() -> GameState {
        let map = MapConfig::parse(MAP).unwrap();
        GameState::new(&map, 3).unwrap()
    }

    fn own(game: &mut GameState, id: PlayerId, pos: Coord, energy: u32) {
        let lh = game.lighthouses.get_mut(&pos).unwrap();
        lh.owner = Some(id);
        lh.energy = energy;
    }

    /// Player 0 owns A, B and C with all three connections.
    fn create_triangle_game() -> GameState {
        let mut game = create_test_game();
        for pos in [A, B, C] {
            own(&mut game, 0, pos, 50);
        }
        let p0 = &mut game.players[0];
        p0.position = A;
        p0.keys.extend([B, C]);
        game.connect(0, A, B).unwrap();
        game.connect(0, A, C).unwrap();

        game.players[0].position = B;
        game.players[0].keys.insert(C);
        game.connect(0, B, C).unwrap();
        game
    }

    #[test]
    fn test_game_state_creation() {
        let game = create_test_game();
        assert_eq!(game.round(), 0);
        assert_eq!(game.lighthouses.len(), 5);
        assert_eq!(game.players.len(), 3);
        assert_eq!(game.players[0].position, Coord::new(5, 5));
        assert_eq!(game.players[2].position, Coord::new(5, 3));
    }

    #[test]
    fn test_too_many_players() {
        let map = MapConfig::parse(MAP).unwrap();
        assert!(matches!(
            GameState::new(&map, 4),
            Err(MapError::NotEnoughStarts {
                available: 3,
                requested: 4
            })
        ));
    }

    #[test]
    fn test_pre_round_energy_pickup() {
        let mut game = create_test_game();
        game.pre_round();

        assert_eq!(game.players[0].energy, 2);
        assert_eq!(game.players[1].energy, 4);
        assert_eq!(game.players[2].energy, 4);
        assert_eq!(game.island.energy(A), 7);
        assert_eq!(game.island.energy(B), 8);
        // Occupied cells are emptied
        assert_eq!(game.island.energy(Coord::new(5, 3)), 0);
    }

    #[test]
    fn test_pre_round_shared_cell_and_keys() {
        let mut game = create_test_game();
        game.players[0].position = A;
        game.players[1].position = A;
        game.pre_round();

        assert_eq!(game.players[0].energy, 3);
        assert_eq!(game.players[1].energy, 3);
        assert!(game.players[0].has_key(A));
        assert!(game.players[1].has_key(A));
        assert!(!game.players[2].has_key(A));
        assert_eq!(game.island.energy(A), 0);
    }

    #[test]
    fn test_pre_round_lighthouse_upkeep() {
        let mut game = create_test_game();
        own(&mut game, 0, D, 15);
        own(&mut game, 1, E, 10);
        game.pre_round();

        assert_eq!(game.lighthouses[&D].energy, 5);
        assert_eq!(game.lighthouses[&D].owner, Some(0));
        assert_eq!(game.lighthouses[&E].energy, 0);
        assert_eq!(game.lighthouses[&E].owner, None);
    }

    #[test]
    fn test_attack_neutral_and_own() {
        let mut game = create_test_game();
        game.players[0].position = A;
        game.players[0].energy = 50;

        game.attack(0, 30).unwrap();
        assert_eq!(game.lighthouses[&A].owner, Some(0));
        assert_eq!(game.lighthouses[&A].energy, 30);
        assert_eq!(game.players[0].energy, 20);

        // Clamped to carried energy
        game.attack(0, 100).unwrap();
        assert_eq!(game.lighthouses[&A].energy, 50);
        assert_eq!(game.players[0].energy, 0);
    }

    #[test]
    fn test_attack_enemy_burns_down_first() {
        let mut game = create_test_game();
        own(&mut game, 1, A, 20);
        game.players[0].position = A;
        game.players[0].energy = 25;

        game.attack(0, 15).unwrap();
        assert_eq!(game.lighthouses[&A].owner, Some(1));
        assert_eq!(game.lighthouses[&A].energy, 5);
        assert_eq!(game.players[0].energy, 10);

        game.attack(0, 10).unwrap();
        assert_eq!(game.lighthouses[&A].owner, Some(0));
        assert_eq!(game.lighthouses[&A].energy, 5);
        assert_eq!(game.players[0].energy, 0);
    }

    #[test]
    fn test_attack_exact_cancel_leaves_neutral() {
        let mut game = create_test_game();
        own(&mut game, 1, A, 20);
        game.players[0].position = A;
        game.players[0].energy = 20;

        game.attack(0, 20).unwrap();
        assert_eq!(game.lighthouses[&A].owner, None);
        assert_eq!(game.lighthouses[&A].energy, 0);
    }

    #[test]
    fn test_attack_rejections() {
        let mut game = create_test_game();
        game.players[0].energy = 10;
        assert_eq!(game.attack(0, 5), Err(MoveError::NotOnLighthouse));

        game.players[0].position = A;
        assert_eq!(game.attack(0, -1), Err(MoveError::NegativeStrength(-1)));
        assert_eq!(game.players[0].energy, 10);
        assert_eq!(game.lighthouses[&A].owner, None);
    }

    #[test]
    fn test_attack_capture_severs_links() {
        let mut game = create_triangle_game();
        game.players[1].position = A;
        game.players[1].energy = 60;

        game.attack(1, 60).unwrap();
        assert_eq!(game.lighthouses[&A].owner, Some(1));
        assert_eq!(game.lighthouses[&A].energy, 10);
        assert_eq!(game.connections.len(), 1);
        assert!(game.triangles.is_empty());
    }

    #[test]
    fn test_connect_builds_triangle() {
        let game = create_triangle_game();
        assert_eq!(game.connections.len(), 3);
        assert_eq!(game.triangles.len(), 1);

        let (tri, cells) = game.triangles.iter().next().unwrap();
        assert_eq!(tri.vertices, [B, C, A]);
        assert_eq!(cells.len(), 6);
        assert!(game.players[0].keys.is_empty());

        let mut links = game.connections_of(A);
        links.sort();
        assert_eq!(links, vec![B, C]);
    }

    #[test]
    fn test_connect_rule_order() {
        let mut game = create_test_game();
        own(&mut game, 0, A, 50);
        own(&mut game, 0, B, 50);
        own(&mut game, 1, C, 50);

        assert_eq!(game.connect(0, A, B), Err(MoveError::NotAtOrigin));
        game.players[0].position = A;
        assert_eq!(
            game.connect(0, A, Coord::new(4, 4)),
            Err(MoveError::UnknownLighthouse)
        );
        assert_eq!(game.connect(0, A, C), Err(MoveError::NotOwned));
        assert_eq!(game.connect(0, A, B), Err(MoveError::MissingKey(B)));

        game.players[0].keys.insert(A);
        assert_eq!(game.connect(0, A, A), Err(MoveError::SelfConnection));

        game.players[0].keys.insert(B);
        game.connect(0, A, B).unwrap();
        game.players[0].keys.insert(B);
        assert_eq!(game.connect(0, A, B), Err(MoveError::AlreadyConnected));
    }

    #[test]
    fn test_connect_blocked_by_lighthouse() {
        let mut game = create_test_game();
        own(&mut game, 0, A, 50);
        own(&mut game, 0, D, 50);
        game.players[0].position = A;
        game.players[0].keys.insert(D);

        assert_eq!(game.connect(0, A, D), Err(MoveError::CrossesLighthouse(B)));
        assert!(game.players[0].has_key(D));
        assert!(game.connections.is_empty());
    }

    #[test]
    fn test_connect_blocked_by_crossing() {
        let mut game = create_triangle_game();
        own(&mut game, 0, E, 50);
        game.players[0].position = A;
        game.players[0].keys.insert(E);

        // A-E passes between B and C
        assert_eq!(game.connect(0, A, E), Err(MoveError::CrossesConnection));
        assert_eq!(game.connections.len(), 3);
    }

    #[test]
    fn test_decay_cascade() {
        let mut game = create_triangle_game();
        assert!(game.decay(A, 1_000));

        let lh = game.lighthouses[&A];
        assert_eq!(lh.owner, None);
        assert_eq!(lh.energy, 0);
        assert!(game.connections.iter().all(|c| !c.touches(A)));
        assert!(game.triangles.keys().all(|t| !t.touches(A)));
        assert_eq!(game.connections.len(), 1);
    }

    #[test]
    fn test_partial_decay_keeps_links() {
        let mut game = create_triangle_game();
        assert!(!game.decay(A, 10));
        assert_eq!(game.connections.len(), 3);
        assert_eq!(game.triangles.len(), 1);
    }

    #[test]
    fn test_post_round_scoring() {
        let mut game = create_test_game();
        // Player 0: two lone lighthouses
        own(&mut game, 0, D, 30);
        own(&mut game, 0, E, 30);
        game.players[0].score = 100;

        // Player 2: full triangle over 6 cells
        for pos in [A, B, C] {
            own(&mut game, 2, pos, 50);
        }
        let tri = Triangle::new(A, B, C);
        game.connections.extend(tri.edges().into_iter().flatten());
        game.triangles.insert(tri, geom::render(tri.vertices));

        let gains = game.post_round();
        assert_eq!(gains, vec![4, 0, 6 + 6 + 6]);
        assert_eq!(game.players[0].score, 104);
        assert_eq!(game.players[1].score, 0);
        assert_eq!(game.players[2].score, 18);
        assert_eq!(game.round(), 1);
    }

    #[test]
    fn test_apply_dispatch() {
        let mut game = create_test_game();
        game.apply(0, Command::Pass).unwrap();
        game.apply(0, Command::Move { dx: -1, dy: 0 }).unwrap();
        assert_eq!(game.players[0].position, Coord::new(4, 5));
        assert_eq!(
            game.apply(0, Command::Move { dx: 0, dy: 2 }),
            Err(MoveError::NotAdjacent { dx: 0, dy: 2 })
        );
        assert_eq!(
            game.apply(9, Command::Pass),
            Err(MoveError::UnknownPlayer(9))
        );
        assert_eq!(
            game.apply(0, Command::Connect { destination: A }),
            Err(MoveError::NotAtOrigin)
        );
    }

    #[test]
    fn test_connect_closes_two_triangles() {
        let mut game = create_test_game();
        for pos in [A, B, C, E] {
            own(&mut game, 0, pos, 50);
        }
        let link = |game: &mut GameState, origin: Coord, dest: Coord| {
            game.players[0].position = origin;
            game.players[0].keys.insert(dest);
            game.connect(0, origin, dest).unwrap();
        };
        link(&mut game, A, B);
        link(&mut game, A, C);
        link(&mut game, E, B);
        link(&mut game, E, C);
        assert!(game.triangles.is_empty());

        // B-C is the shared side of A-B-C and E-B-C
        link(&mut game, B, C);
        assert_eq!(game.connections.len(), 5);
        assert_eq!(game.triangles.len(), 2);
        assert!(game.triangles.keys().all(|t| t.vertices[0] == B));

        let sizes: BTreeMap<Coord, usize> = game
            .triangles
            .iter()
            .map(|(t, cells)| (t.vertices[2], cells.len()))
            .collect();
        assert_eq!(sizes[&A], 6);
        assert_eq!(sizes[&E], 22);

        let lower: BTreeSet<Coord> = game.triangles[&Triangle::new(B, C, A)]
            .iter()
            .copied()
            .collect();
        let upper: BTreeSet<Coord> = game.triangles[&Triangle::new(B, C, E)]
            .iter()
            .copied()
            .collect();
        assert!(lower.is_disjoint(&upper));

        // Two triangles on top of five links and four lighthouses
        assert_eq!(game.post_round(), vec![8 + 10 + 28, 0, 0]);
    }

    #[test]
    fn test_retired_player_score_frozen() {
        let mut game = create_triangle_game();
        let gains = game.post_round();
        assert_eq!(gains[0], 6 + 6 + 6);
        let frozen = game.players[0].score;

        game.retire(0).unwrap();
        for _ in 0..3 {
            game.pre_round();
            assert_eq!(game.post_round()[0], 0);
        }
        assert_eq!(game.players[0].score, frozen);
        // Assets stay on the board and keep decaying
        assert_eq!(game.lighthouses[&A].owner, Some(0));
        assert_eq!(game.lighthouses[&A].energy, 20);
        assert_eq!(game.retire(9), Err(MoveError::UnknownPlayer(9)));
    }
}
