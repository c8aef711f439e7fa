//! Stage Strike - A single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation core (spawning, motion, collisions, stage progression)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard records, sorting and persistence
//! - `platform`: Browser/native platform abstraction (input, storage)
//! - `session`: A run plus its input and leaderboard, for hosts
//! - `web`: Browser bindings (WASM only)

pub mod highscores;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{Leaderboard, LeaderboardEntry};
pub use tuning::{MotionTiming, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame rate the per-frame bullet/enemy steps were balanced at
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Host-side fixed timestep for the headless runner
    pub const SIM_DT: f32 = 1.0 / REFERENCE_FPS;
    /// Longest frame the simulation will integrate in one tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Player ship defaults
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Player speed in units per second
    pub const PLAYER_SPEED: f32 = 200.0;
    /// Distance from the bottom edge to the ship's top-left corner at spawn
    pub const PLAYER_SPAWN_BOTTOM_OFFSET: f32 = 80.0;

    /// Bullet defaults (hitbox is not rotated with direction)
    pub const BULLET_WIDTH: f32 = 16.0;
    pub const BULLET_HEIGHT: f32 = 32.0;
    /// Bullet step per reference frame
    pub const BULLET_SPEED: f32 = 10.0;

    /// Power-up (bomb) size
    pub const POWER_UP_SIZE: f32 = 50.0;

    /// Cleanup margins beyond the play area
    pub const BULLET_CLEANUP_MARGIN: f32 = 50.0;
    pub const ENEMY_CLEANUP_MARGIN: f32 = 100.0;
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_between(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Facing angle of a direction vector (radians, atan2 convention)
#[inline]
pub fn facing_angle(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Convert polar (r, theta) offset to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_between_degenerate() {
        let p = Vec2::new(10.0, 10.0);
        assert!(direction_between(p, p).is_none());

        let dir = direction_between(Vec2::ZERO, Vec2::new(3.0, 4.0)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_facing_angle() {
        use std::f32::consts::FRAC_PI_2;
        assert!(facing_angle(Vec2::new(1.0, 0.0)).abs() < 1e-6);
        assert!((facing_angle(Vec2::new(0.0, 5.0)) - FRAC_PI_2).abs() < 1e-6);
    }
}
