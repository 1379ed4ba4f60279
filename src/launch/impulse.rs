//! Drag-to-force conversion

use glam::Vec2;

use crate::config::LAUNCH_FORCE_MULTIPLIER;
use crate::physics::{BodyId, PhysicsWorld};

/// Applies a one-shot launch force from a finished drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseResolver {
    pub force_multiplier: f32,
}

impl Default for ImpulseResolver {
    fn default() -> Self {
        Self::new(LAUNCH_FORCE_MULTIPLIER)
    }
}

impl ImpulseResolver {
    pub fn new(force_multiplier: f32) -> Self {
        Self { force_multiplier }
    }

    /// Force that a sign-corrected drag delta produces
    ///
    /// The y component is negated again for the world, which measures y
    /// downward: the net force follows the raw screen drag.
    pub fn force_for(&self, delta: Vec2) -> Vec2 {
        let scaled = delta * self.force_multiplier;
        Vec2::new(scaled.x, -scaled.y)
    }

    /// Zero the body's velocity and apply the launch force
    ///
    /// A drag with no measurable travel does nothing. Returns the force applied.
    pub fn apply_impulse(
        &self,
        world: &mut dyn PhysicsWorld,
        body: BodyId,
        delta: Vec2,
    ) -> Option<Vec2> {
        if delta.x.abs() + delta.y.abs() == 0.0 {
            return None;
        }
        let position = world.body(body)?.position;

        // Same launch regardless of leftover bounce velocity
        world.set_velocity(body, Vec2::ZERO);
        let force = self.force_for(delta);
        world.apply_force(body, position, force);
        Some(force)
    }
}
