//! Axis-aligned bounding boxes
//!
//! Every collision in the game (food pickup, enemy contact, shield hits) is a
//! rectangle overlap test. Touching edges do not count as overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Square glyph of edge length `size`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(size),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Strict AABB overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x && a_max.x > other.pos.x && self.pos.y < b_max.y && a_max.y > other.pos.y
    }
}

/// Chebyshev proximity: both axis deltas strictly below `distance`
#[inline]
pub fn within_box_distance(a: Vec2, b: Vec2, distance: f32) -> bool {
    let d = (a - b).abs();
    d.x < distance && d.y < distance
}
