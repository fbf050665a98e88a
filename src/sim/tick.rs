//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call runs
//! the whole pipeline: countdown, invincibility, motion, tile boundary,
//! score goal, food, shield, enemies.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::collision::Rect;
use super::edge::Edge;
use super::enemy::Enemy;
use super::player::{HitResult, Player};
use super::render::{PLAYER_ID, RenderOp, SHIELD_ID};
use super::state::{
    FailureCause, GameEvent, GameMode, GameState, ModeConfig, Outcome, ShieldPolicy,
    TUTORIAL_GOAL_TILE, TutorialMilestone,
};
use super::tile::{self, EdgeCounts};
use crate::consts::*;
use crate::lights;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Filtered accelerometer sample; z is ignored
    pub accel: Vec3,
    /// Rotary encoder detents since the last tick (-1, 0 or +1)
    pub rotary: i8,
}

/// Tutorial tile on which food starts appearing
const TUTORIAL_FOOD_TILE: u32 = 2;
/// Tutorial tile with the first enemy
const TUTORIAL_ENEMY_TILE: u32 = 6;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Don't tick once the mode has an outcome
    if state.is_finished() {
        return;
    }

    state.time_ticks += 1;
    state.now_ms += TICK_MS;

    // Countdown
    if let Some(limit) = state.config.time_limit_ms
        && state.now_ms >= limit
    {
        let outcome = match state.config.mode {
            // Surviving the boss timer is the win condition
            GameMode::Boss => Outcome::BossEscaped,
            _ => Outcome::Failed {
                cause: FailureCause::TimeUp,
                survived_ms: state.now_ms,
            },
        };
        state.finish(outcome);
        return;
    }

    if state.player.update_invincibility(state.now_ms) {
        state.events.push(GameEvent::InvincibilityEnded);
    }

    state.player.motion.step(input.accel);

    if let Some(edge) = tile::touched_edge(state.player.pos())
        && state.allowed.contains(edge)
    {
        enter_next_tile(state, edge);
        if state.is_finished() {
            return;
        }
    }

    // Score goal (tutorial checks its goal at tile transitions instead)
    if let GameMode::Normal { .. } = state.config.mode
        && let Some(target) = state.config.target_score
        && state.player.score >= target
    {
        let remaining_ms = state.remaining_ms().unwrap_or(0);
        state.finish(Outcome::Passed { remaining_ms });
        return;
    }

    let pickup = state
        .registry
        .check_food_collision(&state.player.bounds(), &mut state.render_ops);
    if pickup.count > 0 {
        state.player.add_points(pickup.points);
        state.events.push(GameEvent::FoodEaten {
            points: pickup.points,
            score: state.player.score,
        });
    }

    if let Some(facing) = state.player.rotate_shield(input.rotary) {
        state.draw_shield();
        state.events.push(GameEvent::ShieldRotated(facing));
    }

    resolve_enemies(state);
    if state.is_finished() {
        return;
    }

    // Re-anchor the player-attached glyphs
    state.render_ops.push(RenderOp::Update {
        id: PLAYER_ID,
        pos: state.player.pos(),
        visible: state.player.visible,
    });
    if let Some(segment) = state.player.shield_segment() {
        state.render_ops.push(RenderOp::Update {
            id: SHIELD_ID,
            pos: segment.pos,
            visible: true,
        });
    }
}

/// Wrap the player into a fresh tile through the open edge `crossed`
fn enter_next_tile(state: &mut GameState, crossed: Edge) {
    let exit_pos = state.player.pos();
    state.player.motion.pos = tile::wrap_position(crossed, exit_pos);
    state.tile_count += 1;
    state.last_entry = crossed;

    state.registry.clear(&mut state.render_ops);

    let counts = state.tile_data.counts(crossed).unwrap_or_default();
    match state.config.mode {
        GameMode::Tutorial => spawn_tutorial_tile(state),
        GameMode::Normal { .. } => {
            let enemies = state.config.enemies_per_tile.unwrap_or(counts.enemy);
            spawn_batch(state, EdgeCounts { enemy: enemies, ..counts });
        }
        GameMode::Boss => {
            spawn_batch(state, EdgeCounts { food: 0, ..counts });
            state.registry.spawn_chaser(
                chaser_entry_point(crossed, exit_pos),
                ModeConfig::chaser(),
                state.now_ms,
                &mut state.render_ops,
            );
        }
    }

    // Lay out the tile just entered
    let old_blocked = state.allowed.complement();
    state.allowed = tile::generate_allowed_edges(&mut state.rng, crossed, state.config.edge_odds);
    state.draw_walls(old_blocked, state.allowed.complement());
    state.tile_data = tile::generate_tile_data(&mut state.rng, state.allowed);

    log::debug!(
        "Tile {} entered via {}: open={:?}, food={}, enemies={}",
        state.tile_count,
        crossed,
        state.allowed.iter().collect::<Vec<_>>(),
        state.registry.foods.len(),
        state.registry.enemy_count()
    );
    state.events.push(GameEvent::TileEntered {
        crossed,
        tile_count: state.tile_count,
    });
    state.emit_tile_lights();

    if state.config.mode == GameMode::Tutorial
        && state.tile_count >= TUTORIAL_GOAL_TILE
        && state
            .config
            .target_score
            .is_some_and(|target| state.player.score >= target)
    {
        state.finish(Outcome::TutorialComplete);
    }
}

/// Spawn food and batch enemies around the freshly wrapped player
fn spawn_batch(state: &mut GameState, counts: EdgeCounts) {
    let anchor = state.player.pos();
    if counts.food > 0 {
        let report = state.registry.spawn_food(
            &mut state.rng,
            counts.food as usize,
            anchor,
            FOOD_SPAWN_MARGIN,
            &mut state.render_ops,
        );
        state.note_shortfall(report);
    }
    if counts.enemy > 0 {
        let report = state.registry.spawn_enemies(
            &mut state.rng,
            counts.enemy as usize,
            anchor,
            ENEMY_SPAWN_MARGIN,
            state.config.enemy,
            state.now_ms,
            &mut state.render_ops,
        );
        state.note_shortfall(report);
    }
}

/// Tutorial pacing: food from tile 2, one enemy on tile 6, random after
fn spawn_tutorial_tile(state: &mut GameState) {
    let tile = state.tile_count;
    let mut counts = EdgeCounts::default();

    if tile >= TUTORIAL_FOOD_TILE {
        if tile == TUTORIAL_FOOD_TILE {
            state
                .events
                .push(GameEvent::Milestone(TutorialMilestone::FoodUnlocked));
        }
        counts.food = state.rng.random_range(1..=5);
    }

    if tile == TUTORIAL_ENEMY_TILE {
        state
            .events
            .push(GameEvent::Milestone(TutorialMilestone::FirstEnemy));
        counts.enemy = 1;
    } else if tile > TUTORIAL_ENEMY_TILE {
        counts.enemy = state.rng.random_range(tile::ENEMIES_PER_EDGE);
    }

    if tile == TUTORIAL_GOAL_TILE {
        state
            .events
            .push(GameEvent::Milestone(TutorialMilestone::GoalExplained));
    }

    spawn_batch(state, counts);
}

/// Where the boss chaser re-enters: the spot the player just left, kept
/// fully inside the playfield
fn chaser_entry_point(crossed: Edge, exit_pos: Vec2) -> Vec2 {
    let min = Vec2::splat(WALL_OFFSET);
    let max = Vec2::new(
        SCREEN_WIDTH - ENEMY_SIZE - WALL_OFFSET,
        SCREEN_HEIGHT - ENEMY_SIZE - WALL_OFFSET,
    );
    let pos = match crossed {
        Edge::Up => Vec2::new(exit_pos.x, min.y),
        Edge::Down => Vec2::new(exit_pos.x, max.y),
        Edge::Left => Vec2::new(min.x, exit_pos.y),
        Edge::Right => Vec2::new(max.x, exit_pos.y),
    };
    pos.clamp(min, max)
}

/// Shared context for stepping every enemy of the tile
struct EnemyPass<'a> {
    player: &'a mut Player,
    shield: Option<Rect>,
    now_ms: u64,
    /// Tutorial contact raises the shield instead of hurting
    harmless: bool,
    lives_lights: bool,
    ops: &'a mut Vec<RenderOp>,
    events: &'a mut Vec<GameEvent>,
    defeated: bool,
    shield_unlocked: bool,
}

impl EnemyPass<'_> {
    /// Activate, move and resolve contacts for one enemy
    ///
    /// Returns false when the enemy was neutralized by the shield.
    fn step(&mut self, enemy: &mut Enemy) -> bool {
        let player_pos = self.player.pos();

        if enemy.check_activation(player_pos) {
            log::debug!("Enemy {} activated", enemy.id);
            self.events.push(GameEvent::EnemyActivated { id: enemy.id });
        }

        let before = (enemy.pos, enemy.glyph_on);
        enemy.update(player_pos, self.now_ms);
        if before != (enemy.pos, enemy.glyph_on) {
            self.ops.push(RenderOp::Update {
                id: enemy.id,
                pos: enemy.pos,
                visible: enemy.glyph_on,
            });
        }

        if enemy.hits_any(self.shield.as_slice()) {
            log::debug!("Enemy {} neutralized by shield", enemy.id);
            self.ops.push(RenderOp::Remove { id: enemy.id });
            self.events.push(GameEvent::EnemyNeutralized { id: enemy.id });
            return false;
        }

        let touching = enemy.bounds().overlaps(&self.player.bounds());

        if self.harmless {
            if touching && !self.player.shield.enabled {
                self.player.shield.enabled = true;
                self.shield_unlocked = true;
                self.events.push(GameEvent::ShieldUnlocked);
            }
            return true;
        }

        if !touching || self.player.is_invincible() {
            return true;
        }

        match self.player.apply_hit(self.now_ms) {
            HitResult::Ignored => {}
            HitResult::Damaged { lives_left } => {
                log::info!("Player hit by enemy {}: {} lives left", enemy.id, lives_left);
                self.events.push(GameEvent::PlayerHit { lives_left });
                if self.lives_lights {
                    self.events
                        .push(GameEvent::Indicators(lights::lives_signal(lives_left)));
                }
            }
            HitResult::Defeated => {
                self.events.push(GameEvent::PlayerHit { lives_left: 0 });
                self.defeated = true;
            }
        }
        true
    }
}

/// Step batch enemies then the chaser; the first fatal hit ends the pass
fn resolve_enemies(state: &mut GameState) {
    let shield = state.player.shield_segment();
    let GameState {
        registry,
        player,
        render_ops,
        events,
        config,
        now_ms,
        ..
    } = &mut *state;

    let mut pass = EnemyPass {
        player,
        shield,
        now_ms: *now_ms,
        harmless: config.shield == ShieldPolicy::UnlockOnContact,
        lives_lights: config.lives_lights,
        ops: render_ops,
        events,
        defeated: false,
        shield_unlocked: false,
    };

    registry.enemies.retain_mut(|enemy| pass.defeated || pass.step(enemy));

    if !pass.defeated
        && let Some(mut chaser) = registry.chaser.take()
        && pass.step(&mut chaser)
    {
        registry.chaser = Some(chaser);
    }

    let (defeated, shield_unlocked) = (pass.defeated, pass.shield_unlocked);

    if shield_unlocked {
        state.draw_shield();
    }

    if defeated {
        let outcome = match state.config.mode {
            GameMode::Boss => Outcome::BossDefeated,
            _ => Outcome::Failed {
                cause: FailureCause::OutOfLives,
                survived_ms: state.now_ms,
            },
        };
        state.finish(outcome);
    }
}
