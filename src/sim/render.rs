//! Display-list operations emitted by the simulation
//!
//! The core never draws. It tells the render collaborator which squares and
//! rectangles exist, where they are, and whether they are visible.

use glam::Vec2;

use super::collision::Rect;
use super::edge::Edge;
use super::enemy::EnemyStyle;

/// Fixed display ids; spawned entities start at `FIRST_ENTITY_ID`
pub const PLAYER_ID: u32 = 1;
pub const SHIELD_ID: u32 = 2;
pub const FIRST_ENTITY_ID: u32 = 16;

/// Display id of the wall drawn along `edge`
#[inline]
pub fn wall_id(edge: Edge) -> u32 {
    3 + edge.index() as u32
}

/// What a display object depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Player,
    Food,
    Enemy(EnemyStyle),
    Wall(Edge),
    Shield,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Create {
        id: u32,
        glyph: Glyph,
        rect: Rect,
        visible: bool,
    },
    Update {
        id: u32,
        pos: Vec2,
        visible: bool,
    },
    Remove {
        id: u32,
    },
}

impl RenderOp {
    pub fn id(&self) -> u32 {
        match self {
            RenderOp::Create { id, .. } | RenderOp::Update { id, .. } | RenderOp::Remove { id } => {
                *id
            }
        }
    }
}
