//! Player status: lives, score, invincibility and the shield

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::edge::Edge;
use super::motion::Motion;
use crate::consts::*;

/// Player-anchored segment that neutralizes enemies on contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub facing: Edge,
    pub enabled: bool,
}

impl Default for Shield {
    fn default() -> Self {
        Self {
            facing: Edge::Up,
            enabled: false,
        }
    }
}

impl Shield {
    /// Segment rectangle for a ball at `player` (top-left corner)
    pub fn segment(&self, player: Vec2) -> Rect {
        let center = player + Vec2::splat(BALL_SIZE / 2.0);
        let along_x = Vec2::new(SHIELD_LENGTH, SHIELD_THICKNESS);
        let along_y = Vec2::new(SHIELD_THICKNESS, SHIELD_LENGTH);
        match self.facing {
            Edge::Up => Rect::new(
                Vec2::new(center.x - SHIELD_LENGTH / 2.0, player.y - SHIELD_GAP - SHIELD_THICKNESS),
                along_x,
            ),
            Edge::Down => Rect::new(
                Vec2::new(center.x - SHIELD_LENGTH / 2.0, player.y + BALL_SIZE + SHIELD_GAP),
                along_x,
            ),
            Edge::Left => Rect::new(
                Vec2::new(player.x - SHIELD_GAP - SHIELD_THICKNESS, center.y - SHIELD_LENGTH / 2.0),
                along_y,
            ),
            Edge::Right => Rect::new(
                Vec2::new(player.x + BALL_SIZE + SHIELD_GAP, center.y - SHIELD_LENGTH / 2.0),
                along_y,
            ),
        }
    }
}

/// Result of an enemy touching the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    /// Player was invincible, nothing happened
    Ignored,
    /// A life was lost and the invincibility window started
    Damaged { lives_left: u32 },
    /// The last life was lost
    Defeated,
}

/// The player ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub motion: Motion,
    pub lives: u32,
    pub score: u32,
    /// End of the current invincibility window (simulated ms)
    pub invincible_until: Option<u64>,
    /// Render visibility, toggled while invincible
    pub visible: bool,
    last_blink_ms: u64,
    pub shield: Shield,
}

impl Player {
    pub fn new(pos: Vec2, lives: u32) -> Self {
        Self {
            motion: Motion::at_rest(pos),
            lives,
            score: 0,
            invincible_until: None,
            visible: true,
            last_blink_ms: 0,
            shield: Shield::default(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.motion.pos
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.motion.pos, BALL_SIZE)
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    /// Apply an enemy contact at `now_ms`
    ///
    /// Hits during the invincibility window are ignored and never extend it.
    pub fn apply_hit(&mut self, now_ms: u64) -> HitResult {
        if self.is_invincible() {
            return HitResult::Ignored;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            return HitResult::Defeated;
        }

        self.invincible_until = Some(now_ms + INVINCIBILITY_MS);
        self.last_blink_ms = now_ms;
        self.visible = false;
        HitResult::Damaged {
            lives_left: self.lives,
        }
    }

    /// Advance the blink and expire the invincibility window
    ///
    /// Returns true on the tick invincibility ends.
    pub fn update_invincibility(&mut self, now_ms: u64) -> bool {
        let Some(until) = self.invincible_until else {
            return false;
        };

        if now_ms >= until {
            self.invincible_until = None;
            self.visible = true;
            return true;
        }

        if now_ms - self.last_blink_ms >= PLAYER_BLINK_MS {
            self.last_blink_ms = now_ms;
            self.visible = !self.visible;
        }
        false
    }

    /// Rotate the shield one step clockwise for any non-zero rotary step
    ///
    /// Returns the new facing if it changed.
    pub fn rotate_shield(&mut self, rotary_step: i8) -> Option<Edge> {
        if !self.shield.enabled || rotary_step == 0 {
            return None;
        }
        self.shield.facing = self.shield.facing.clockwise();
        Some(self.shield.facing)
    }

    /// Current shield segment, if the shield is up
    pub fn shield_segment(&self) -> Option<Rect> {
        self.shield
            .enabled
            .then(|| self.shield.segment(self.motion.pos))
    }

    pub fn add_points(&mut self, points: u32) {
        self.score += points;
    }
}
