//! Property tests over the simulation core

use glam::{Vec2, Vec3};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use tilt_arcade::consts::*;
use tilt_arcade::sim::{
    Edge, Enemy, EnemyStyle, ExtraEdgeOdds, generate_allowed_edges, generate_tile_data, integrate,
};

fn edge_strategy() -> impl Strategy<Value = Edge> {
    prop_oneof![
        Just(Edge::Up),
        Just(Edge::Down),
        Just(Edge::Left),
        Just(Edge::Right),
    ]
}

fn in_playfield(p: Vec2) -> bool {
    p.x >= WALL_OFFSET
        && p.x <= SCREEN_WIDTH - BALL_SIZE - WALL_OFFSET
        && p.y >= WALL_OFFSET
        && p.y <= SCREEN_HEIGHT - BALL_SIZE - WALL_OFFSET
}

proptest! {
    #[test]
    fn velocity_and_position_stay_clamped(
        samples in prop::collection::vec((-1.0e6f32..1.0e6, -1.0e6f32..1.0e6), 1..200),
    ) {
        let mut pos = Vec2::new(64.0, 32.0);
        let mut vel = Vec2::ZERO;
        for (ax, ay) in samples {
            (pos, vel) = integrate(pos, vel, Vec3::new(ax, ay, 0.0));
            prop_assert!(vel.x.abs() <= MAX_SPEED);
            prop_assert!(vel.y.abs() <= MAX_SPEED);
            prop_assert!(in_playfield(pos));
        }
    }

    #[test]
    fn allowed_edges_keep_retreat_path(
        seed in any::<u64>(),
        entry in edge_strategy(),
        tutorial in any::<bool>(),
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let odds = if tutorial { ExtraEdgeOdds::TUTORIAL } else { ExtraEdgeOdds::STANDARD };
        let allowed = generate_allowed_edges(&mut rng, entry, odds);
        prop_assert!(allowed.contains(entry.opposite()));
        prop_assert!(!allowed.contains(entry));
        prop_assert!((1..=3).contains(&allowed.len()));
    }

    #[test]
    fn tile_data_covers_exactly_allowed_edges(seed in any::<u64>(), entry in edge_strategy()) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let allowed = generate_allowed_edges(&mut rng, entry, ExtraEdgeOdds::STANDARD);
        let data = generate_tile_data(&mut rng, allowed);

        for edge in Edge::ALL {
            prop_assert_eq!(data.counts(edge).is_some(), allowed.contains(edge));
        }
        let best_food = allowed.iter().filter_map(|e| data.counts(e)).map(|c| c.food).max();
        for edge in data.food_max.iter() {
            prop_assert_eq!(data.counts(edge).map(|c| c.food), best_food);
        }
        prop_assert!(!data.food_max.is_empty());
        prop_assert!(!data.enemy_max.is_empty());
    }

    #[test]
    fn enemy_activation_is_monotonic(
        path in prop::collection::vec((0.0f32..128.0, 0.0f32..64.0), 1..100),
    ) {
        let mut enemy = Enemy::new(16, Vec2::new(60.0, 30.0), ENEMY_SIZE, 0.5, 20.0, EnemyStyle::Spiky, 0);
        let mut was_active = false;
        for (i, (x, y)) in path.into_iter().enumerate() {
            let player = Vec2::new(x, y);
            enemy.check_activation(player);
            enemy.update(player, i as u64 * TICK_MS);
            if was_active {
                prop_assert!(enemy.active);
            }
            was_active = enemy.active;
        }
    }
}
