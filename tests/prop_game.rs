//! Property-based tests for game mechanics.
//!
//! These tests verify geometry, the energy field and that arbitrary command
//! streams never break the game invariants.
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use proptest::prelude::*;

use lighthouses::game::invariants::check_invariants;
use lighthouses::game::{Command, Coord, GameState, Island, MAX_ENERGY, MapConfig};
use lighthouses::geom;

const MAP: &str = include_str!("../maps/simple.txt");

fn coord() -> impl Strategy<Value = Coord> {
    (0u16..40, 0u16..40).prop_map(|(x, y)| Coord::new(x, y))
}

fn command() -> impl Strategy<Value = (u8, Command)> {
    let cmd = prop_oneof![
        Just(Command::Pass),
        (-1i64..=1, -1i64..=1).prop_map(|(dx, dy)| Command::Move { dx, dy }),
        (-5i64..60).prop_map(|energy| Command::Attack { energy }),
        (0u16..12, 0u16..12).prop_map(|(x, y)| Command::Connect {
            destination: Coord::new(x, y)
        }),
    ];
    (0u8..3, cmd)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Energy stays within bounds whatever is added.
    #[test]
    fn prop_energy_bounded(deltas in prop::collection::vec(0i64..500, 1..40)) {
        let rows: Vec<Vec<bool>> = (0..5)
            .map(|y| (0..5).map(|x| (1..4).contains(&x) && (1..4).contains(&y)).collect())
            .collect();
        let mut island = Island::new(&rows).unwrap();
        let cell = Coord::new(2, 2);
        for delta in deltas {
            island.add_energy(cell, delta);
            prop_assert!(island.energy(cell) <= MAX_ENERGY);
        }
    }

    /// The open intersection test is symmetric in both arguments.
    #[test]
    fn prop_intersect_symmetric(a in coord(), b in coord(), c in coord(), d in coord()) {
        let forward = geom::intersect((a, b), (c, d));
        prop_assert_eq!(forward, geom::intersect((c, d), (a, b)));
        prop_assert_eq!(forward, geom::intersect((b, a), (d, c)));
    }

    /// Segments sharing an endpoint never count as crossing.
    #[test]
    fn prop_shared_endpoint_never_intersects(a in coord(), b in coord(), c in coord()) {
        prop_assert!(!geom::intersect((a, b), (a, c)));
    }

    /// Rasterized cells are unique, inside the bounding box and independent
    /// of vertex order.
    #[test]
    fn prop_render_well_formed(a in coord(), b in coord(), c in coord()) {
        let cells = geom::render([a, b, c]);
        let unique: BTreeSet<Coord> = cells.iter().copied().collect();
        prop_assert_eq!(unique.len(), cells.len());

        let (min_x, max_x) = (a.x.min(b.x).min(c.x), a.x.max(b.x).max(c.x));
        let (min_y, max_y) = (a.y.min(b.y).min(c.y), a.y.max(b.y).max(c.y));
        for cell in &cells {
            prop_assert!((min_x..=max_x).contains(&cell.x));
            prop_assert!((min_y..=max_y).contains(&cell.y));
        }

        let swapped: BTreeSet<Coord> = geom::render([b, a, c]).into_iter().collect();
        let rotated: BTreeSet<Coord> = geom::render([c, a, b]).into_iter().collect();
        prop_assert_eq!(&unique, &swapped);
        prop_assert_eq!(&unique, &rotated);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Arbitrary command streams keep every invariant and never lower a score.
    #[test]
    fn prop_rounds_keep_invariants(
        rounds in prop::collection::vec(prop::collection::vec(command(), 0..6), 1..40)
    ) {
        let map = MapConfig::parse(MAP).unwrap();
        let mut game = GameState::new(&map, 3).unwrap();

        for commands in rounds {
            game.pre_round();
            prop_assert!(check_invariants(&game).is_empty());

            for (id, cmd) in commands {
                let before = game.players[usize::from(id)].position;
                // Keep attackers supplied so captures actually happen
                game.players[usize::from(id)].energy += 20;
                if game.apply(id, cmd).is_ok()
                    && let Command::Move { .. } = cmd
                {
                    let after = game.players[usize::from(id)].position;
                    let dx = i32::from(after.x) - i32::from(before.x);
                    let dy = i32::from(after.y) - i32::from(before.y);
                    prop_assert_eq!(dx.abs().max(dy.abs()), 1);
                    prop_assert!(game.island.walkable(after));
                }
                let violations = check_invariants(&game);
                prop_assert!(violations.is_empty(), "{:?}", violations);
            }

            let scores: Vec<u64> = game.players.iter().map(|p| p.score).collect();
            let gains = game.post_round();
            for ((player, old), gain) in game.players.iter().zip(scores).zip(gains) {
                prop_assert_eq!(player.score, old + gain);
            }
        }
    }
}
