//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod edge;
pub mod enemy;
pub mod entities;
pub mod motion;
pub mod player;
pub mod render;
pub mod state;
pub mod tick;
pub mod tile;

pub use collision::Rect;
pub use edge::{Edge, EdgeSet};
pub use enemy::{Enemy, EnemyStyle};
pub use entities::{EntityRegistry, Food, FoodPickup, SpawnReport};
pub use motion::{Motion, integrate};
pub use player::{HitResult, Player, Shield};
pub use render::{Glyph, PLAYER_ID, RenderOp, SHIELD_ID, wall_id};
pub use state::{
    Difficulty, FailureCause, GameEvent, GameMode, GamePhase, GameState, ModeConfig, Outcome,
    ShieldPolicy, TutorialMilestone,
};
pub use tick::{TickInput, tick};
pub use tile::{
    EdgeCounts, ExtraEdgeOdds, TileData, generate_allowed_edges, generate_tile_data,
    touched_edge, wrap_position,
};
