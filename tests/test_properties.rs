//! Property tests for perception and decision.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reactive_grid::simulation::agent::decide;
use reactive_grid::simulation::grid::{GridWorld, Percept, Position};

fn world_strategy() -> impl Strategy<Value = (GridWorld, u64)> {
    (1usize..12, 1usize..12, any::<u64>(), 0.0f64..1.0).prop_map(|(rows, cols, seed, density)| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let capacity = rows * cols - 1;
        let count = (capacity as f64 * density) as usize;
        (GridWorld::initialize(rows, cols, count, &mut rng).unwrap(), seed)
    })
}

proptest! {
    #[test]
    fn percepts_match_bounds((world, _) in world_strategy(), r in 0usize..12, c in 0usize..12) {
        let pos = Position::new(r % world.rows(), c % world.cols());
        let p = world.percepts_at(pos);
        prop_assert_eq!(p.up == Percept::Wall, pos.row == 0);
        prop_assert_eq!(p.left == Percept::Wall, pos.col == 0);
        prop_assert_eq!(p.down == Percept::Wall, pos.row + 1 == world.rows());
        prop_assert_eq!(p.right == Percept::Wall, pos.col + 1 == world.cols());
        prop_assert_eq!(p, world.percepts_at(pos));
    }

    #[test]
    fn decide_only_picks_empty((world, seed) in world_strategy(), r in 0usize..12, c in 0usize..12) {
        let pos = Position::new(r % world.rows(), c % world.cols());
        let percepts = world.percepts_at(pos);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        match decide(&percepts, &mut rng) {
            Some(d) => prop_assert_eq!(percepts.get(d), Percept::Empty),
            None => prop_assert!(percepts.passable().is_empty()),
        }
    }

    #[test]
    fn placement_respects_count((rows, cols) in (1usize..10, 1usize..10), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let count = (rows * cols - 1) / 2;
        let world = GridWorld::initialize(rows, cols, count, &mut rng).unwrap();
        prop_assert_eq!(world.obstacle_count(), count);
        prop_assert!(!world.obstacle_positions().contains(&Position::START));
    }
}
