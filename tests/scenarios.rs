//! End-to-end gameplay scenarios through the public API

use glam::{Vec2, Vec3};

use tilt_arcade::consts::*;
use tilt_arcade::platform::{DisplayList, RenderSink};
use tilt_arcade::sim::state::start_position;
use tilt_arcade::sim::{
    Difficulty, Edge, EdgeSet, Enemy, EnemyStyle, FailureCause, GameEvent, GameState, Glyph,
    HitResult, ModeConfig, Outcome, Player, TickInput, tick,
};

const REST: TickInput = TickInput {
    accel: Vec3::ZERO,
    rotary: 0,
};

fn empty_tile(config: ModeConfig) -> GameState {
    let mut state = GameState::new(config, 2024);
    let mut ops = Vec::new();
    state.registry.clear(&mut ops);
    state.registry.clear_chaser(&mut ops);
    state.drain_events();
    state.drain_render_ops();
    state
}

fn park_enemy_on_player(state: &mut GameState) {
    let id = state.registry.next_entity_id();
    state.registry.enemies.push(Enemy::new(
        id,
        state.player.pos(),
        ENEMY_SIZE,
        0.0,
        10.0,
        EnemyStyle::Spiky,
        state.now_ms,
    ));
}

#[test]
fn resting_player_stays_put() {
    let mut state = empty_tile(ModeConfig::normal(Difficulty::Easy, 1));
    for _ in 0..100 {
        tick(&mut state, &REST);
    }
    assert_eq!(state.player.pos(), start_position());
    assert_eq!(state.player.motion.vel, Vec2::ZERO);
    assert_eq!(state.tile_count, 0);
    assert!(!state.is_finished());
}

#[test]
fn crossing_open_top_edge_wraps_to_bottom() {
    let mut state = empty_tile(ModeConfig::normal(Difficulty::Easy, 1));
    state.allowed = EdgeSet::single(Edge::Up);
    state.player.motion.pos = Vec2::new(50.0, WALL_OFFSET - 1.0);

    tick(&mut state, &REST);

    assert_eq!(state.player.pos().y, SCREEN_HEIGHT - BALL_SIZE - WALL_OFFSET - BALL_SIZE / 2.0);
    assert_eq!(state.player.pos().x, 50.0);
    assert!(state.allowed.contains(Edge::Down));
    assert_eq!(state.tile_count, 1);
}

#[test]
fn third_hit_ends_medium_run() {
    let mut state = empty_tile(ModeConfig::normal(Difficulty::Medium, 1));
    park_enemy_on_player(&mut state);

    let mut hits = 0;
    while !state.is_finished() {
        tick(&mut state, &REST);
        for event in state.drain_events() {
            if let GameEvent::PlayerHit { .. } = event {
                hits += 1;
            }
        }
        if hits < 3 {
            assert!(!state.is_finished(), "finished after {hits} hits");
        }
    }

    assert_eq!(hits, 3);
    assert_eq!(state.player.lives, 0);
    assert_eq!(
        state.outcome(),
        Some(Outcome::Failed {
            cause: FailureCause::OutOfLives,
            survived_ms: TICK_MS + 2 * INVINCIBILITY_MS,
        })
    );
}

#[test]
fn boss_timer_means_escape_regardless_of_score() {
    let mut state = empty_tile(ModeConfig::boss());
    state.player.score = 999;
    state.now_ms = 60_000 - TICK_MS;

    tick(&mut state, &REST);

    assert_eq!(state.outcome(), Some(Outcome::BossEscaped));
    assert!(state.player.lives > 0);
}

#[test]
fn invincibility_is_not_extended_by_repeat_hits() {
    let mut player = Player::new(start_position(), 3);
    assert_eq!(player.apply_hit(1_000), HitResult::Damaged { lives_left: 2 });
    assert_eq!(player.apply_hit(2_500), HitResult::Ignored);
    assert!(!player.update_invincibility(3_999));
    assert!(player.is_invincible());
    assert!(player.update_invincibility(4_000));
    assert!(!player.is_invincible());
    assert!(player.visible);
    assert_eq!(player.lives, 2);
}

#[test]
fn invincibility_ends_in_tick_pipeline() {
    let mut state = empty_tile(ModeConfig::normal(Difficulty::Easy, 1));
    park_enemy_on_player(&mut state);
    tick(&mut state, &REST);
    let hit_at = state.now_ms;
    state.registry.enemies.clear();

    while state.now_ms < hit_at + INVINCIBILITY_MS - TICK_MS {
        tick(&mut state, &REST);
        assert!(state.player.is_invincible());
    }
    state.drain_events();
    tick(&mut state, &REST);
    assert_eq!(state.now_ms, hit_at + INVINCIBILITY_MS);
    assert!(!state.player.is_invincible());
    assert!(state.drain_events().contains(&GameEvent::InvincibilityEnded));
}

#[test]
fn display_list_mirrors_registry() {
    let mut state = GameState::new(ModeConfig::normal(Difficulty::Easy, 8), 31337);
    let mut display = DisplayList::new();

    for i in 0..4_000u32 {
        // Sweep the tilt around so the player crosses edges
        let phase = (i / 90) % 4;
        let accel = match phase {
            0 => Vec3::new(2.0, 0.5, 0.0),
            1 => Vec3::new(-0.5, 2.0, 0.0),
            2 => Vec3::new(-2.0, -0.5, 0.0),
            _ => Vec3::new(0.5, -2.0, 0.0),
        };
        let input = TickInput {
            accel,
            rotary: i8::from(i % 200 == 0),
        };
        tick(&mut state, &input);
        for op in state.drain_render_ops() {
            display.apply(&op);
        }
        if state.is_finished() {
            break;
        }

        assert_eq!(display.count(|g| *g == Glyph::Food), state.registry.foods.len());
        assert_eq!(
            display.count(|g| matches!(g, Glyph::Enemy(_))),
            state.registry.enemy_count()
        );
        assert_eq!(
            display.count(|g| matches!(g, Glyph::Wall(_))),
            state.allowed.complement().len()
        );
        assert_eq!(display.count(|g| *g == Glyph::Shield), 1);
    }

    assert_eq!(display.stray_ops, 0);
    assert!(state.tile_count > 0);
}
