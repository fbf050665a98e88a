//! Enemy behaviour
//!
//! Enemies sit dormant until the player comes within their activation box,
//! then home in one axis-step at a time for the rest of their lifetime.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, within_box_distance};
use crate::consts::ENEMY_BLINK_MS;

/// Visual style tag, only the blink style animates its glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyStyle {
    /// Static spiky disc used for batch-spawned enemies
    Spiky,
    /// Flickering disc used for the boss chaser
    Blink,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Step length per axis per tick once active
    pub speed: f32,
    /// Chebyshev radius that wakes the enemy
    pub activation_distance: f32,
    pub style: EnemyStyle,
    /// Latched once the player comes close
    pub active: bool,
    /// Current glyph phase for blink-style enemies
    pub glyph_on: bool,
    last_toggle_ms: u64,
}

impl Enemy {
    pub fn new(
        id: u32,
        pos: Vec2,
        size: f32,
        speed: f32,
        activation_distance: f32,
        style: EnemyStyle,
        now_ms: u64,
    ) -> Self {
        Self {
            id,
            pos,
            size,
            speed,
            activation_distance,
            style,
            active: false,
            glyph_on: true,
            last_toggle_ms: now_ms,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Wake up if the player is inside the activation box
    ///
    /// Returns true only on the tick the enemy becomes active.
    pub fn check_activation(&mut self, player: Vec2) -> bool {
        if self.active {
            return false;
        }
        if within_box_distance(self.pos, player, self.activation_distance) {
            self.active = true;
            return true;
        }
        false
    }

    /// Animate the glyph and, when active, step toward the player
    ///
    /// Each axis moves independently by `speed`, so diagonal approaches close
    /// faster than straight ones.
    pub fn update(&mut self, player: Vec2, now_ms: u64) {
        if self.style == EnemyStyle::Blink && now_ms.saturating_sub(self.last_toggle_ms) > ENEMY_BLINK_MS {
            self.last_toggle_ms = now_ms;
            self.glyph_on = !self.glyph_on;
        }

        if !self.active {
            return;
        }

        self.pos.x += step_toward(self.pos.x, player.x, self.speed);
        self.pos.y += step_toward(self.pos.y, player.y, self.speed);
    }

    /// True if any of the given rectangles touches this enemy
    pub fn hits_any(&self, rects: &[Rect]) -> bool {
        let bounds = self.bounds();
        rects.iter().any(|r| bounds.overlaps(r))
    }
}

#[inline]
fn step_toward(from: f32, to: f32, speed: f32) -> f32 {
    if from < to {
        speed
    } else if from > to {
        -speed
    } else {
        0.0
    }
}
