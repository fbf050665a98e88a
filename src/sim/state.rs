//! Game state and core simulation types
//!
//! One `GameState` exists per mode invocation. Nothing survives a tile
//! transition except the player's aggregate status.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::edge::{Edge, EdgeSet};
use super::enemy::EnemyStyle;
use super::entities::{EnemyTemplate, EntityRegistry};
use super::player::Player;
use super::render::{Glyph, PLAYER_ID, RenderOp, SHIELD_ID, wall_id};
use super::tile::{self, ExtraEdgeOdds, TileData};
use crate::consts::*;
use crate::lights::{self, IndicatorFrame};

/// Run index of the endless hard-mode variant
pub const ENDLESS_RUN_INDEX: u32 = 20;

/// Normal-mode difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Difficulty::Easy),
            1 => Some(Difficulty::Medium),
            2 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "0" => Some(Difficulty::Easy),
            "medium" | "med" | "1" => Some(Difficulty::Medium),
            "hard" | "2" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Countdown length
    pub fn time_limit_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 60_000,
            Difficulty::Medium => 40_000,
            Difficulty::Hard => 30_000,
        }
    }

    pub fn lives(&self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 3,
            Difficulty::Hard => 1,
        }
    }
}

/// Which of the three game modes is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Tutorial,
    Normal { difficulty: Difficulty, run_index: u32 },
    Boss,
}

/// How the shield becomes available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldPolicy {
    Disabled,
    Enabled,
    /// Enemies are harmless; the first contact raises the shield
    UnlockOnContact,
}

/// Per-mode tuning
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConfig {
    pub mode: GameMode,
    pub lives: u32,
    pub time_limit_ms: Option<u64>,
    pub target_score: Option<u32>,
    /// Batch-spawned enemy parameters
    pub enemy: EnemyTemplate,
    /// Overrides tile data enemy counts when set
    pub enemies_per_tile: Option<u32>,
    pub shield: ShieldPolicy,
    /// Show food/enemy maxima on the indicator lights
    pub direction_lights: bool,
    /// Show remaining lives on the indicator lights
    pub lives_lights: bool,
    pub edge_odds: ExtraEdgeOdds,
}

/// Tutorial score goal, checked at tile transitions
pub const TUTORIAL_TARGET_SCORE: u32 = 10;
/// Tiles crossed before the tutorial goal is checked
pub const TUTORIAL_GOAL_TILE: u32 = 8;
pub const NORMAL_TARGET_SCORE: u32 = 10;
pub const BOSS_TIME_LIMIT_MS: u64 = 60_000;
pub const BOSS_LIVES: u32 = 10;

impl ModeConfig {
    pub fn tutorial() -> Self {
        Self {
            mode: GameMode::Tutorial,
            lives: 3,
            time_limit_ms: None,
            target_score: Some(TUTORIAL_TARGET_SCORE),
            enemy: EnemyTemplate::spiky(0.4, 20.0),
            enemies_per_tile: None,
            shield: ShieldPolicy::UnlockOnContact,
            direction_lights: false,
            lives_lights: false,
            edge_odds: ExtraEdgeOdds::TUTORIAL,
        }
    }

    /// Normal run; enemies get faster and more alert with every passed run
    pub fn normal(difficulty: Difficulty, run_index: u32) -> Self {
        let endless = run_index == ENDLESS_RUN_INDEX;
        let level = run_index as f32;
        Self {
            mode: GameMode::Normal {
                difficulty,
                run_index,
            },
            lives: difficulty.lives(),
            time_limit_ms: Some(if endless {
                1_000_000
            } else {
                difficulty.time_limit_ms()
            }),
            target_score: Some(if endless { 1_000 } else { NORMAL_TARGET_SCORE }),
            enemy: EnemyTemplate::spiky(0.1 + 0.1 * level, 10.0 + 2.0 * level),
            enemies_per_tile: endless.then_some(1),
            shield: if run_index > 6 {
                ShieldPolicy::Enabled
            } else {
                ShieldPolicy::Disabled
            },
            direction_lights: run_index > 3,
            lives_lights: false,
            edge_odds: ExtraEdgeOdds::STANDARD,
        }
    }

    pub fn boss() -> Self {
        Self {
            mode: GameMode::Boss,
            lives: BOSS_LIVES,
            time_limit_ms: Some(BOSS_TIME_LIMIT_MS),
            target_score: None,
            enemy: EnemyTemplate::spiky(0.8, 30.0),
            enemies_per_tile: None,
            shield: ShieldPolicy::Disabled,
            direction_lights: false,
            lives_lights: true,
            edge_odds: ExtraEdgeOdds::STANDARD,
        }
    }

    /// The boss-mode chaser
    pub fn chaser() -> EnemyTemplate {
        EnemyTemplate {
            size: ENEMY_SIZE,
            speed: 1.0,
            activation_distance: 150.0,
            style: EnemyStyle::Blink,
        }
    }

    pub fn is_endless(&self) -> bool {
        self.enemies_per_tile.is_some()
    }
}

/// Why a normal run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    TimeUp,
    OutOfLives,
}

/// Terminal result of a mode invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    TutorialComplete,
    Passed { remaining_ms: u64 },
    Failed { cause: FailureCause, survived_ms: u64 },
    /// Boss timer ran out with lives left
    BossEscaped,
    /// Boss took the last life
    BossDefeated,
}

impl Outcome {
    /// Whether the player achieved the mode's goal
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::TutorialComplete | Outcome::Passed { .. } | Outcome::BossEscaped
        )
    }
}

/// Current phase of a mode invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Finished(Outcome),
}

/// Tutorial pacing points a host can hang dialogue on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialMilestone {
    /// Food starts appearing
    FoodUnlocked,
    /// The first enemy shows up
    FirstEnemy,
    /// The score goal now counts
    GoalExplained,
}

/// Gameplay events for hosts (dialogue, sound, lights)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TileEntered { crossed: Edge, tile_count: u32 },
    FoodEaten { points: u32, score: u32 },
    EnemyActivated { id: u32 },
    EnemyNeutralized { id: u32 },
    PlayerHit { lives_left: u32 },
    InvincibilityEnded,
    ShieldUnlocked,
    ShieldRotated(Edge),
    Milestone(TutorialMilestone),
    SpawnShortfall { requested: usize, placed: usize },
    Indicators(IndicatorFrame),
    Finished(Outcome),
}

/// Complete state of one mode invocation (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub config: ModeConfig,
    /// Simulated clock
    pub now_ms: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Open edges of the current tile
    pub allowed: EdgeSet,
    /// Edge crossed to reach the current tile
    pub last_entry: Edge,
    /// Spawn counts behind each open edge of the current tile
    pub tile_data: TileData,
    /// Tiles crossed so far
    pub tile_count: u32,
    pub registry: EntityRegistry,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Display ops since the last drain
    pub render_ops: Vec<RenderOp>,
}

/// Player start position (screen center)
pub fn start_position() -> Vec2 {
    Vec2::new((SCREEN_WIDTH / 2.0).floor(), (SCREEN_HEIGHT / 2.0).floor())
}

/// Food on the first normal-mode tile
pub const OPENING_FOOD: usize = 10;
/// Enemies on the first normal-mode tile
pub const OPENING_ENEMIES: usize = 1;
/// Boss chaser start position
pub const CHASER_START: Vec2 = Vec2::new(20.0, 20.0);

impl GameState {
    /// Set up the opening tile of a mode
    pub fn new(config: ModeConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut player = Player::new(start_position(), config.lives);
        player.shield.enabled = config.shield == ShieldPolicy::Enabled;

        // The opening tile behaves as if entered through the top
        let last_entry = Edge::Up;
        let allowed = tile::generate_allowed_edges(&mut rng, last_entry, config.edge_odds);
        let tile_data = tile::generate_tile_data(&mut rng, allowed);

        let mut state = Self {
            seed,
            rng,
            config,
            now_ms: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player,
            allowed,
            last_entry,
            tile_data,
            tile_count: 0,
            registry: EntityRegistry::new(),
            events: Vec::new(),
            render_ops: Vec::new(),
        };

        state.render_ops.push(RenderOp::Create {
            id: PLAYER_ID,
            glyph: Glyph::Player,
            rect: state.player.bounds(),
            visible: true,
        });
        state.draw_walls(EdgeSet::EMPTY, allowed.complement());
        state.draw_shield();
        state.spawn_opening_entities();
        state.emit_tile_lights();
        if state.config.lives_lights {
            let frame = lights::lives_signal(state.player.lives);
            state.events.push(GameEvent::Indicators(frame));
        }

        log::info!(
            "Mode {:?} started: lives={}, open edges={:?}",
            state.config.mode,
            state.player.lives,
            state.allowed.iter().collect::<Vec<_>>()
        );

        state
    }

    fn spawn_opening_entities(&mut self) {
        let anchor = self.player.pos();
        match self.config.mode {
            GameMode::Normal { .. } => {
                let report = self.registry.spawn_food(
                    &mut self.rng,
                    OPENING_FOOD,
                    anchor,
                    FOOD_SPAWN_MARGIN,
                    &mut self.render_ops,
                );
                self.note_shortfall(report);
                let report = self.registry.spawn_enemies(
                    &mut self.rng,
                    OPENING_ENEMIES,
                    anchor,
                    ENEMY_SPAWN_MARGIN,
                    self.config.enemy,
                    self.now_ms,
                    &mut self.render_ops,
                );
                self.note_shortfall(report);
            }
            GameMode::Boss => {
                self.registry.spawn_chaser(
                    CHASER_START,
                    ModeConfig::chaser(),
                    self.now_ms,
                    &mut self.render_ops,
                );
            }
            GameMode::Tutorial => {}
        }
    }

    pub(crate) fn note_shortfall(&mut self, report: super::entities::SpawnReport) {
        if report.is_short() {
            log::warn!(
                "Spawn shortfall: placed {} of {} requested",
                report.placed,
                report.requested
            );
            self.events.push(GameEvent::SpawnShortfall {
                requested: report.requested,
                placed: report.placed,
            });
        }
    }

    /// Replace the wall rectangles drawn for `old_blocked` with `new_blocked`
    pub(crate) fn draw_walls(&mut self, old_blocked: EdgeSet, new_blocked: EdgeSet) {
        for edge in old_blocked.iter() {
            self.render_ops.push(RenderOp::Remove { id: wall_id(edge) });
        }
        for edge in new_blocked.iter() {
            self.render_ops.push(RenderOp::Create {
                id: wall_id(edge),
                glyph: Glyph::Wall(edge),
                rect: tile::wall_rect(edge),
                visible: true,
            });
        }
    }

    /// (Re)create the shield segment at the current facing
    pub(crate) fn draw_shield(&mut self) {
        if let Some(rect) = self.player.shield_segment() {
            self.render_ops.push(RenderOp::Remove { id: SHIELD_ID });
            self.render_ops.push(RenderOp::Create {
                id: SHIELD_ID,
                glyph: Glyph::Shield,
                rect,
                visible: true,
            });
        }
    }

    /// Direction hints for the tile just generated
    pub(crate) fn emit_tile_lights(&mut self) {
        if self.config.direction_lights {
            let frame = lights::direction_signal(self.tile_data.food_max, self.tile_data.enemy_max);
            self.events.push(GameEvent::Indicators(frame));
        }
    }

    /// Enter a terminal phase; further ticks are no-ops
    pub fn finish(&mut self, outcome: Outcome) {
        if self.is_finished() {
            return;
        }
        log::info!(
            "Mode {:?} finished after {} ms: {:?} (score={}, lives={})",
            self.config.mode,
            self.now_ms,
            outcome,
            self.player.score,
            self.player.lives
        );
        self.phase = GamePhase::Finished(outcome);
        self.events.push(GameEvent::Indicators(IndicatorFrame::OFF));
        self.events.push(GameEvent::Finished(outcome));
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Finished(outcome) => Some(outcome),
            GamePhase::Playing => None,
        }
    }

    /// Countdown remaining, for timed modes
    pub fn remaining_ms(&self) -> Option<u64> {
        self.config
            .time_limit_ms
            .map(|limit| limit.saturating_sub(self.now_ms))
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_render_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.render_ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parameters() {
        assert_eq!(Difficulty::Easy.lives(), 5);
        assert_eq!(Difficulty::Medium.time_limit_ms(), 40_000);
        assert_eq!(Difficulty::Hard.lives(), 1);
        assert_eq!(Difficulty::from_index(2), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_index(3), None);
        assert_eq!(Difficulty::from_str("MED"), Some(Difficulty::Medium));
    }

    #[test]
    fn test_normal_config_scales_with_run_index() {
        let early = ModeConfig::normal(Difficulty::Easy, 1);
        let late = ModeConfig::normal(Difficulty::Easy, 7);
        assert!(late.enemy.speed > early.enemy.speed);
        assert!(late.enemy.activation_distance > early.enemy.activation_distance);
        assert_eq!(early.shield, ShieldPolicy::Disabled);
        assert_eq!(late.shield, ShieldPolicy::Enabled);
        assert!(!early.direction_lights);
        assert!(late.direction_lights);

        let endless = ModeConfig::normal(Difficulty::Hard, ENDLESS_RUN_INDEX);
        assert!(endless.is_endless());
        assert_eq!(endless.target_score, Some(1_000));
    }

    #[test]
    fn test_opening_tile_normal() {
        let state = GameState::new(ModeConfig::normal(Difficulty::Easy, 1), 42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos(), Vec2::new(64.0, 32.0));
        assert!(state.allowed.contains(Edge::Down));
        assert!(state.registry.foods.len() <= OPENING_FOOD);
        assert!(!state.registry.foods.is_empty());
        assert_eq!(state.registry.enemies.len(), OPENING_ENEMIES);
        assert!(state.registry.chaser.is_none());
        // Player glyph is the first display object
        assert!(matches!(
            state.render_ops.first(),
            Some(RenderOp::Create { id: PLAYER_ID, .. })
        ));
    }

    #[test]
    fn test_opening_tile_boss() {
        let state = GameState::new(ModeConfig::boss(), 42);
        assert!(state.registry.foods.is_empty());
        assert!(state.registry.enemies.is_empty());
        let chaser = state.registry.chaser.as_ref().unwrap();
        assert_eq!(chaser.pos, CHASER_START);
        assert_eq!(chaser.style, EnemyStyle::Blink);
        assert_eq!(state.player.lives, BOSS_LIVES);
        assert!(matches!(state.events.last(), Some(GameEvent::Indicators(_))));
    }

    #[test]
    fn test_finish_is_sticky() {
        let mut state = GameState::new(ModeConfig::tutorial(), 1);
        state.finish(Outcome::TutorialComplete);
        state.finish(Outcome::BossDefeated);
        assert_eq!(state.outcome(), Some(Outcome::TutorialComplete));
    }
}
