//! Ball spawning and out-of-bounds respawn

use glam::Vec2;

use crate::config::{OUT_OF_BOUNDS_MARGIN, WorldConfig};
use crate::consts::{BALL_LABEL, BALL_RESTITUTION};
use crate::entry_point;
use crate::physics::{BodyId, BodyOptions, PhysicsWorld};

/// Keeps the ball in play by replacing it when it leaves sideways
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleGuard {
    playfield: Vec2,
    entry: Vec2,
    radius: f32,
    margin: f32,
    sprite: Option<String>,
}

impl LifecycleGuard {
    pub fn new(config: &WorldConfig, margin: f32) -> Self {
        Self {
            playfield: config.playfield(),
            entry: config.ball_entry(),
            radius: config.ball_radius,
            margin,
            sprite: config.sprite.clone(),
        }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Where every ball starts, derived from the configured entry fraction
    pub fn spawn_point(&self) -> Vec2 {
        entry_point(self.entry, self.playfield, self.radius)
    }

    /// Create a ball at the spawn point
    pub fn spawn(&self, world: &mut dyn PhysicsWorld) -> BodyId {
        let at = self.spawn_point();
        let options = BodyOptions {
            restitution: BALL_RESTITUTION,
            sprite: self.sprite.clone(),
            ..BodyOptions::labeled(BALL_LABEL)
        };
        world.create_circle_body(at.x, at.y, self.radius, options)
    }

    /// Horizontal exit test; leaving through the top or bottom never counts
    pub fn is_out_of_bounds(&self, x: f32) -> bool {
        x > self.playfield.x + self.radius + self.margin || x < -self.radius - self.margin
    }

    /// Replace the ball if it has left the playfield, returning the new handle
    pub fn check_and_respawn(&self, world: &mut dyn PhysicsWorld, body: BodyId) -> Option<BodyId> {
        match world.body(body) {
            Some(ball) if !self.is_out_of_bounds(ball.position.x) => return None,
            Some(ball) => log::debug!("Ball {:?} left the playfield at x={:.1}", body, ball.position.x),
            None => log::warn!("Ball {:?} vanished from the world, spawning a new one", body),
        }

        world.remove_body(body);
        Some(self.spawn(world))
    }
}

impl Default for LifecycleGuard {
    fn default() -> Self {
        Self::new(&WorldConfig::default(), OUT_OF_BOUNDS_MARGIN)
    }
}
