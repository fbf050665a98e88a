//! Per-tile entity registry
//!
//! Owns the food and enemies of the current tile. Everything is cleared on a
//! tile transition before the next batch is spawned; only the boss chaser has
//! its own lifecycle.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, within_box_distance};
use super::enemy::{Enemy, EnemyStyle};
use super::render::{FIRST_ENTITY_ID, Glyph, RenderOp};
use crate::consts::*;

/// A food pellet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub points: u32,
    pub eaten: bool,
}

impl Food {
    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Mark as eaten if the player overlaps it
    ///
    /// An already-eaten pellet never reports a second hit.
    pub fn check_collision(&mut self, player: &Rect) -> bool {
        if self.eaten {
            return false;
        }
        if self.bounds().overlaps(player) {
            self.eaten = true;
            return true;
        }
        false
    }
}

/// Shared parameters of a batch of enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub size: f32,
    pub speed: f32,
    pub activation_distance: f32,
    pub style: EnemyStyle,
}

impl EnemyTemplate {
    pub fn spiky(speed: f32, activation_distance: f32) -> Self {
        Self {
            size: ENEMY_SIZE,
            speed,
            activation_distance,
            style: EnemyStyle::Spiky,
        }
    }
}

/// How many entities a spawn request actually placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnReport {
    pub requested: usize,
    pub placed: usize,
}

impl SpawnReport {
    pub fn is_short(&self) -> bool {
        self.placed < self.requested
    }
}

/// Food collected in one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FoodPickup {
    pub count: u32,
    pub points: u32,
}

/// Active entities of the current tile
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    /// Uneaten food, in spawn order
    pub foods: Vec<Food>,
    /// Batch-spawned enemies, in spawn order
    pub enemies: Vec<Enemy>,
    /// Boss-mode chaser, respawned on every tile entry
    pub chaser: Option<Enemy>,
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            foods: Vec::new(),
            enemies: Vec::new(),
            chaser: None,
            next_id: FIRST_ENTITY_ID,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rejection-sample up to `n` positions away from `player`
    ///
    /// Candidates lie on the pixel grid inside the walls, inset by `size`.
    /// A candidate is rejected only when it is within `margin` of the player
    /// on both axes. Gives up after `SPAWN_ATTEMPTS_PER_ENTITY * n` draws and
    /// returns whatever was accepted.
    pub fn sample_positions<R: Rng>(
        rng: &mut R,
        n: usize,
        size: f32,
        player: Vec2,
        margin: f32,
    ) -> Vec<Vec2> {
        let lo = (WALL_OFFSET + size) as i32;
        let hi_x = (SCREEN_WIDTH - WALL_OFFSET - size) as i32;
        let hi_y = (SCREEN_HEIGHT - WALL_OFFSET - size) as i32;

        let mut positions = Vec::with_capacity(n);
        let max_attempts = n * SPAWN_ATTEMPTS_PER_ENTITY;
        let mut attempts = 0;

        while positions.len() < n && attempts < max_attempts {
            attempts += 1;
            let candidate = Vec2::new(
                rng.random_range(lo..=hi_x) as f32,
                rng.random_range(lo..=hi_y) as f32,
            );
            if within_box_distance(candidate, player, margin) {
                continue;
            }
            positions.push(candidate);
        }

        positions
    }

    /// Spawn `n` food pellets away from the player
    pub fn spawn_food<R: Rng>(
        &mut self,
        rng: &mut R,
        n: usize,
        player: Vec2,
        margin: f32,
        ops: &mut Vec<RenderOp>,
    ) -> SpawnReport {
        let positions = Self::sample_positions(rng, n, FOOD_SIZE, player, margin);
        for pos in &positions {
            let food = Food {
                id: self.next_entity_id(),
                pos: *pos,
                size: FOOD_SIZE,
                points: FOOD_POINTS,
                eaten: false,
            };
            ops.push(RenderOp::Create {
                id: food.id,
                glyph: Glyph::Food,
                rect: food.bounds(),
                visible: true,
            });
            self.foods.push(food);
        }
        SpawnReport {
            requested: n,
            placed: positions.len(),
        }
    }

    /// Spawn `n` dormant enemies away from the player
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_enemies<R: Rng>(
        &mut self,
        rng: &mut R,
        n: usize,
        player: Vec2,
        margin: f32,
        template: EnemyTemplate,
        now_ms: u64,
        ops: &mut Vec<RenderOp>,
    ) -> SpawnReport {
        let positions = Self::sample_positions(rng, n, template.size, player, margin);
        for pos in &positions {
            let enemy = self.make_enemy(*pos, template, now_ms);
            ops.push(create_enemy_op(&enemy));
            self.enemies.push(enemy);
        }
        SpawnReport {
            requested: n,
            placed: positions.len(),
        }
    }

    /// Replace the chaser with a fresh one at `pos`
    pub fn spawn_chaser(
        &mut self,
        pos: Vec2,
        template: EnemyTemplate,
        now_ms: u64,
        ops: &mut Vec<RenderOp>,
    ) {
        self.clear_chaser(ops);
        let chaser = self.make_enemy(pos, template, now_ms);
        ops.push(create_enemy_op(&chaser));
        self.chaser = Some(chaser);
    }

    fn make_enemy(&mut self, pos: Vec2, template: EnemyTemplate, now_ms: u64) -> Enemy {
        Enemy::new(
            self.next_entity_id(),
            pos,
            template.size,
            template.speed,
            template.activation_distance,
            template.style,
            now_ms,
        )
    }

    pub fn clear_chaser(&mut self, ops: &mut Vec<RenderOp>) {
        if let Some(chaser) = self.chaser.take() {
            ops.push(RenderOp::Remove { id: chaser.id });
        }
    }

    /// Drop all food and batch enemies of the tile being left
    pub fn clear(&mut self, ops: &mut Vec<RenderOp>) {
        for food in self.foods.drain(..) {
            ops.push(RenderOp::Remove { id: food.id });
        }
        for enemy in self.enemies.drain(..) {
            ops.push(RenderOp::Remove { id: enemy.id });
        }
    }

    /// Eat every pellet the player overlaps and drop it from the active set
    pub fn check_food_collision(&mut self, player: &Rect, ops: &mut Vec<RenderOp>) -> FoodPickup {
        let mut pickup = FoodPickup::default();
        for food in &mut self.foods {
            if food.check_collision(player) {
                pickup.count += 1;
                pickup.points += food.points;
                ops.push(RenderOp::Remove { id: food.id });
            }
        }
        self.foods.retain(|f| !f.eaten);
        pickup
    }

    /// Enemy by display id, including the chaser
    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies
            .iter()
            .chain(self.chaser.iter())
            .find(|e| e.id == id)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len() + usize::from(self.chaser.is_some())
    }
}

pub(crate) fn create_enemy_op(enemy: &Enemy) -> RenderOp {
    RenderOp::Create {
        id: enemy.id,
        glyph: Glyph::Enemy(enemy.style),
        rect: enemy.bounds(),
        visible: enemy.glyph_on,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_sampled_positions_respect_margin_and_walls() {
        let mut rng = Pcg32::seed_from_u64(5);
        let player = Vec2::new(64.0, 32.0);
        let positions = EntityRegistry::sample_positions(&mut rng, 20, ENEMY_SIZE, player, 15.0);
        assert_eq!(positions.len(), 20);
        for p in positions {
            assert!(!within_box_distance(p, player, 15.0));
            assert!(p.x >= WALL_OFFSET + ENEMY_SIZE && p.x <= SCREEN_WIDTH - WALL_OFFSET - ENEMY_SIZE);
            assert!(p.y >= WALL_OFFSET + ENEMY_SIZE && p.y <= SCREEN_HEIGHT - WALL_OFFSET - ENEMY_SIZE);
            assert_eq!(p.x.fract(), 0.0);
        }
    }

    #[test]
    fn test_sampling_gives_up_with_short_list() {
        let mut rng = Pcg32::seed_from_u64(5);
        // A margin covering the whole screen rejects every candidate
        let positions =
            EntityRegistry::sample_positions(&mut rng, 4, ENEMY_SIZE, Vec2::new(64.0, 32.0), 500.0);
        assert!(positions.is_empty());
    }

    #[test]
    fn test_spawn_reports_shortfall() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut registry = EntityRegistry::new();
        let mut ops = Vec::new();
        let report = registry.spawn_food(&mut rng, 3, Vec2::new(64.0, 32.0), 500.0, &mut ops);
        assert!(report.is_short());
        assert_eq!(report.placed, 0);
        assert!(ops.is_empty());
    }

    #[test]
    fn test_food_pickup_is_idempotent() {
        let mut food = Food {
            id: 16,
            pos: Vec2::new(30.0, 30.0),
            size: FOOD_SIZE,
            points: 1,
            eaten: false,
        };
        let player = Rect::square(Vec2::new(28.0, 28.0), BALL_SIZE);
        assert!(food.check_collision(&player));
        assert!(!food.check_collision(&player));
        assert!(food.eaten);
    }

    #[test]
    fn test_registry_pickup_removes_eaten_food() {
        let mut registry = EntityRegistry::new();
        let mut ops = Vec::new();
        for pos in [Vec2::new(30.0, 30.0), Vec2::new(31.0, 31.0), Vec2::new(90.0, 40.0)] {
            let id = registry.next_entity_id();
            registry.foods.push(Food {
                id,
                pos,
                size: FOOD_SIZE,
                points: 1,
                eaten: false,
            });
        }

        let player = Rect::square(Vec2::new(29.0, 29.0), BALL_SIZE);
        let pickup = registry.check_food_collision(&player, &mut ops);
        assert_eq!(pickup, FoodPickup { count: 2, points: 2 });
        assert_eq!(registry.foods.len(), 1);
        assert_eq!(ops.len(), 2);

        // Same spot again: nothing left to eat
        let pickup = registry.check_food_collision(&player, &mut ops);
        assert_eq!(pickup, FoodPickup::default());
    }

    #[test]
    fn test_clear_leaves_no_carryover() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut registry = EntityRegistry::new();
        let mut ops = Vec::new();
        let player = Vec2::new(64.0, 32.0);
        registry.spawn_food(&mut rng, 5, player, FOOD_SPAWN_MARGIN, &mut ops);
        registry.spawn_enemies(&mut rng, 3, player, ENEMY_SPAWN_MARGIN, EnemyTemplate::spiky(0.5, 20.0), 0, &mut ops);
        registry.spawn_chaser(Vec2::new(20.0, 20.0), EnemyTemplate::spiky(1.0, 150.0), 0, &mut ops);
        ops.clear();

        registry.clear(&mut ops);
        assert!(registry.foods.is_empty());
        assert!(registry.enemies.is_empty());
        assert_eq!(ops.len(), 8);
        assert!(ops.iter().all(|op| matches!(op, RenderOp::Remove { .. })));
        // The chaser has its own lifecycle
        assert!(registry.chaser.is_some());
        assert_eq!(registry.enemy_count(), 1);
    }

    #[test]
    fn test_chaser_respawn_replaces_previous() {
        let mut registry = EntityRegistry::new();
        let mut ops = Vec::new();
        let template = EnemyTemplate::spiky(1.0, 150.0);
        registry.spawn_chaser(Vec2::new(20.0, 20.0), template, 0, &mut ops);
        let first = registry.chaser.as_ref().unwrap().id;
        registry.spawn_chaser(Vec2::new(60.0, 5.0), template, 0, &mut ops);
        let second = registry.chaser.as_ref().unwrap();
        assert_ne!(first, second.id);
        assert_eq!(second.pos, Vec2::new(60.0, 5.0));
        assert!(ops.contains(&RenderOp::Remove { id: first }));
        assert!(registry.enemy(first).is_none());
    }
}
