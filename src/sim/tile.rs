//! Tile boundaries and procedural tile generation
//!
//! The playfield is one screen-sized tile. Touching an edge either acts as a
//! wall or, when the edge is open, wraps the ball to the opposite side of a
//! freshly generated tile.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::edge::{Edge, EdgeSet};
use crate::consts::*;

/// Food count range per open edge
pub const FOOD_PER_EDGE: std::ops::RangeInclusive<u32> = 5..=20;
/// Enemy count range per open edge
pub const ENEMIES_PER_EDGE: std::ops::RangeInclusive<u32> = 0..=3;

/// Which edge the ball is touching, if any
///
/// Checked in UP, DOWN, LEFT, RIGHT order so corners resolve to the first.
pub fn touched_edge(pos: Vec2) -> Option<Edge> {
    if pos.y <= WALL_OFFSET {
        Some(Edge::Up)
    } else if pos.y >= SCREEN_HEIGHT - BALL_SIZE - WALL_OFFSET {
        Some(Edge::Down)
    } else if pos.x <= WALL_OFFSET {
        Some(Edge::Left)
    } else if pos.x >= SCREEN_WIDTH - BALL_SIZE - WALL_OFFSET {
        Some(Edge::Right)
    } else {
        None
    }
}

/// Teleport the ball to the inner boundary opposite `crossed`
pub fn wrap_position(crossed: Edge, pos: Vec2) -> Vec2 {
    let half = BALL_SIZE / 2.0;
    match crossed {
        Edge::Up => Vec2::new(pos.x, SCREEN_HEIGHT - BALL_SIZE - WALL_OFFSET - half),
        Edge::Down => Vec2::new(pos.x, WALL_OFFSET + half),
        Edge::Left => Vec2::new(SCREEN_WIDTH - BALL_SIZE - WALL_OFFSET - half, pos.y),
        Edge::Right => Vec2::new(WALL_OFFSET + half, pos.y),
    }
}

/// Wall rectangle drawn along a blocked edge
pub fn wall_rect(edge: Edge) -> Rect {
    let inner_w = SCREEN_WIDTH - WALL_PADDING * 2.0;
    let inner_h = SCREEN_HEIGHT - WALL_PADDING * 2.0;
    match edge {
        Edge::Up => Rect::new(
            Vec2::new(WALL_PADDING, WALL_PADDING),
            Vec2::new(inner_w, WALL_THICKNESS),
        ),
        Edge::Down => Rect::new(
            Vec2::new(WALL_PADDING, SCREEN_HEIGHT - WALL_PADDING - WALL_THICKNESS),
            Vec2::new(inner_w, WALL_THICKNESS),
        ),
        Edge::Left => Rect::new(
            Vec2::new(WALL_PADDING, WALL_PADDING),
            Vec2::new(WALL_THICKNESS, inner_h),
        ),
        Edge::Right => Rect::new(
            Vec2::new(SCREEN_WIDTH - WALL_PADDING - WALL_THICKNESS, WALL_PADDING),
            Vec2::new(WALL_THICKNESS, inner_h),
        ),
    }
}

/// Thresholds on a uniform roll deciding how many extra edges open up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtraEdgeOdds {
    /// Roll below this: no extra edge
    pub none_below: f32,
    /// Roll below this (and above `none_below`): one extra edge, else two
    pub one_below: f32,
}

impl ExtraEdgeOdds {
    pub const STANDARD: ExtraEdgeOdds = ExtraEdgeOdds {
        none_below: 0.33,
        one_below: 0.7,
    };
    /// Tutorial tiles favour corridors over junctions
    pub const TUTORIAL: ExtraEdgeOdds = ExtraEdgeOdds {
        none_below: 0.5,
        one_below: 0.9,
    };

    fn extra_count(&self, roll: f32) -> usize {
        if roll < self.none_below {
            0
        } else if roll < self.one_below {
            1
        } else {
            2
        }
    }
}

/// Open edges of the tile entered through `entry`
///
/// The retreat edge (opposite `entry`) is always open. Extra edges are drawn
/// without replacement from the two side edges; `entry` itself is never
/// offered again.
pub fn generate_allowed_edges<R: Rng>(rng: &mut R, entry: Edge, odds: ExtraEdgeOdds) -> EdgeSet {
    let retreat = entry.opposite();
    let mut allowed = EdgeSet::single(retreat);

    let pool: Vec<Edge> = Edge::ALL
        .into_iter()
        .filter(|&e| e != entry && e != retreat)
        .collect();
    let extra = odds.extra_count(rng.random::<f32>());
    for &edge in pool.choose_multiple(rng, extra) {
        allowed.insert(edge);
    }

    allowed
}

/// Spawn counts for the tile behind one open edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeCounts {
    pub food: u32,
    pub enemy: u32,
}

/// Per-edge spawn counts for the next tile, plus the edges holding the most
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileData {
    counts: [Option<EdgeCounts>; 4],
    /// Edges tied for the highest food count
    pub food_max: EdgeSet,
    /// Edges tied for the highest enemy count
    pub enemy_max: EdgeSet,
}

impl TileData {
    /// Counts behind `edge`, `None` when the edge is walled
    pub fn counts(&self, edge: Edge) -> Option<EdgeCounts> {
        self.counts[edge.index()]
    }
}

/// Roll food/enemy counts for every open edge
pub fn generate_tile_data<R: Rng>(rng: &mut R, allowed: EdgeSet) -> TileData {
    assert!(!allowed.is_empty(), "tile generated with no open edge");

    let mut data = TileData::default();
    for edge in allowed.iter() {
        data.counts[edge.index()] = Some(EdgeCounts {
            food: rng.random_range(FOOD_PER_EDGE),
            enemy: rng.random_range(ENEMIES_PER_EDGE),
        });
    }

    let present = || data.counts.iter().flatten();
    let max_food = present().map(|c| c.food).max().unwrap_or(0);
    let max_enemy = present().map(|c| c.enemy).max().unwrap_or(0);

    for edge in allowed.iter() {
        if let Some(c) = data.counts[edge.index()] {
            if c.food == max_food {
                data.food_max.insert(edge);
            }
            if c.enemy == max_enemy {
                data.enemy_max.insert(edge);
            }
        }
    }

    data
}
