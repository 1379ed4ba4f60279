//! Tinyball - fling a ball at a target with a pointer drag
//!
//! Core modules:
//! - `physics`: Rigid-body world service (bodies, forces, collision events, runner)
//! - `launch`: Drag gesture, impulse, trajectory forecast and respawn logic
//! - `arena`: Playfield setup (ground, target, ball entry point)
//! - `score`: Collision-driven score counter
//! - `renderer`: WebGPU rendering pipeline and viewport scaling
//! - `presence`: Best-effort multiplayer presence messages
//! - `config`: Data-driven configuration and launch tuning
//! - `audio`: Procedural sound effects (playback on the web only)

pub mod arena;
pub mod audio;
pub mod config;
pub mod launch;
pub mod physics;
pub mod presence;
pub mod renderer;
pub mod score;

pub use arena::Arena;
pub use config::{ConfigError, GameConfig, LaunchTuning, WorldConfig};
pub use launch::{LaunchEvent, Launcher};
pub use score::ScoreCounter;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, the physics base delta)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Playfield edge length in world units (the canvas is square)
    pub const BASE_WIDTH: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    pub const BALL_RESTITUTION: f32 = 0.93;

    /// Ground slab height
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Target post dimensions
    pub const TARGET_WIDTH: f32 = 20.0;
    pub const TARGET_HEIGHT: f32 = 120.0;

    /// Body labels used by collision consumers
    pub const BALL_LABEL: &str = "ball";
    pub const TARGET_LABEL: &str = "target";
    pub const GROUND_LABEL: &str = "ground";
}

/// Convert an entry fraction into a spawn position.
///
/// World y grows downward, so the vertical fraction is measured up from the
/// bottom edge. The half-radius inset keeps the ball off the playfield edge.
#[inline]
pub fn entry_point(fraction: Vec2, playfield: Vec2, radius: f32) -> Vec2 {
    Vec2::new(
        playfield.x * fraction.x + radius / 2.0,
        playfield.y - playfield.y * fraction.y - radius / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_point_bottom_left() {
        let pos = entry_point(Vec2::new(0.1, 0.1), Vec2::new(600.0, 600.0), 20.0);
        assert!((pos.x - 70.0).abs() < 1e-4);
        assert!((pos.y - 530.0).abs() < 1e-4);
    }

    #[test]
    fn test_entry_point_center() {
        let pos = entry_point(Vec2::new(0.5, 0.5), Vec2::new(600.0, 400.0), 20.0);
        assert_eq!(pos, Vec2::new(310.0, 190.0));
    }
}
