//! Tilt Arcade - a tilt-steered tile crawler for a 128x64 handheld
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, tiles, entities, player status)
//! - `modes`: Tutorial / normal / boss entry points driving the tick loop
//! - `campaign`: Progression across runs over the persisted record
//! - `platform`: Collaborator interfaces (input, render, lights, pacing)
//! - `persistence`: Save record and leaderboard storage
//! - `lights`: Four-way indicator colors

pub mod campaign;
pub mod highscores;
pub mod lights;
pub mod modes;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use campaign::{Campaign, Stage};
pub use highscores::HighScores;
pub use modes::{BossOutcome, run_boss, run_normal, run_tutorial};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Display dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 128.0;
    pub const SCREEN_HEIGHT: f32 = 64.0;
    /// Inset of the playfield from the screen border
    pub const WALL_OFFSET: f32 = 5.0;

    /// Player ball edge length
    pub const BALL_SIZE: f32 = 5.0;
    pub const ENEMY_SIZE: f32 = 8.0;
    pub const FOOD_SIZE: f32 = 2.0;
    pub const FOOD_POINTS: u32 = 1;

    /// Tilt to velocity gain per tick
    pub const ACC_SCALE: f32 = 0.3;
    /// Viscous damping applied every tick after clamping
    pub const FRICTION: f32 = 0.90;
    /// Per-axis velocity cap (pixels/tick)
    pub const MAX_SPEED: f32 = 2.5;

    /// Fixed simulation timestep (~66 Hz)
    pub const TICK_MS: u64 = 15;
    /// Post-hit invincibility window
    pub const INVINCIBILITY_MS: u64 = 3_000;
    /// Player visibility toggle period while invincible
    pub const PLAYER_BLINK_MS: u64 = 150;
    /// Glyph toggle period of blink-style enemies
    pub const ENEMY_BLINK_MS: u64 = 50;

    /// Minimum rectangular clearance between the player and spawned food
    pub const FOOD_SPAWN_MARGIN: f32 = 10.0;
    /// Minimum rectangular clearance between the player and spawned enemies
    pub const ENEMY_SPAWN_MARGIN: f32 = 15.0;
    /// Rejection sampling budget per requested entity
    pub const SPAWN_ATTEMPTS_PER_ENTITY: usize = 20;

    /// Shield segment geometry (long side, short side, gap from the ball)
    pub const SHIELD_LENGTH: f32 = 9.0;
    pub const SHIELD_THICKNESS: f32 = 1.0;
    pub const SHIELD_GAP: f32 = 2.0;

    /// Blocked-edge wall geometry
    pub const WALL_THICKNESS: f32 = 3.0;
    pub const WALL_PADDING: f32 = 2.0;
}
