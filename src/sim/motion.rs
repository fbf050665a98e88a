//! Tilt-to-motion integration
//!
//! Each tick the accelerometer reading is turned into a velocity change,
//! clamped, damped and integrated. The z axis is ignored.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Player kinematic state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Top-left corner of the ball
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Motion {
    pub fn at_rest(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
        }
    }

    /// Advance one tick with the given tilt sample
    pub fn step(&mut self, accel: Vec3) {
        let (pos, vel) = integrate(self.pos, self.vel, accel);
        self.pos = pos;
        self.vel = vel;
    }
}

/// Lowest allowed ball coordinate on each axis
#[inline]
pub fn min_position() -> Vec2 {
    Vec2::splat(WALL_OFFSET)
}

/// Highest allowed ball coordinate on each axis
#[inline]
pub fn max_position() -> Vec2 {
    Vec2::new(
        SCREEN_WIDTH - BALL_SIZE - WALL_OFFSET,
        SCREEN_HEIGHT - BALL_SIZE - WALL_OFFSET,
    )
}

/// Pure integration step: returns `(position, velocity)`
///
/// Screen y grows downward, so positive tilt on the sensor's y axis pushes
/// the ball up.
pub fn integrate(pos: Vec2, vel: Vec2, accel: Vec3) -> (Vec2, Vec2) {
    let mut vel = vel + Vec2::new(accel.x, -accel.y) * ACC_SCALE;
    vel = vel.clamp(Vec2::splat(-MAX_SPEED), Vec2::splat(MAX_SPEED));
    vel *= FRICTION;

    let pos = (pos + vel).clamp(min_position(), max_position());
    (pos, vel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_stays_at_rest() {
        let mut motion = Motion::at_rest(Vec2::new(64.0, 32.0));
        for _ in 0..100 {
            motion.step(Vec3::ZERO);
        }
        assert_eq!(motion.pos, Vec2::new(64.0, 32.0));
        assert_eq!(motion.vel, Vec2::ZERO);
    }

    #[test]
    fn test_y_axis_is_inverted() {
        let (_, vel) = integrate(Vec2::new(64.0, 32.0), Vec2::ZERO, Vec3::new(1.0, 1.0, 9.8));
        assert!(vel.x > 0.0);
        assert!(vel.y < 0.0);
        // z is ignored
        assert!((vel.x - ACC_SCALE * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_friction_applied_after_clamp() {
        let (_, vel) = integrate(Vec2::new(64.0, 32.0), Vec2::ZERO, Vec3::new(100.0, -100.0, 0.0));
        assert!((vel.x - MAX_SPEED * FRICTION).abs() < 1e-6);
        assert!((vel.y - MAX_SPEED * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_position_clamped_to_playfield() {
        let (pos, _) = integrate(Vec2::new(6.0, 6.0), Vec2::new(-2.5, -2.5), Vec3::new(-50.0, 50.0, 0.0));
        assert_eq!(pos, min_position());

        let (pos, _) = integrate(max_position(), Vec2::splat(2.5), Vec3::new(50.0, -50.0, 0.0));
        assert_eq!(pos, max_position());
    }

    #[test]
    fn test_velocity_decays_without_tilt() {
        let mut motion = Motion {
            pos: Vec2::new(64.0, 32.0),
            vel: Vec2::new(2.0, -2.0),
        };
        for _ in 0..200 {
            motion.step(Vec3::ZERO);
        }
        assert!(motion.vel.length() < 1e-3);
    }
}
