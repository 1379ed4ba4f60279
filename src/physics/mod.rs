//! Rigid-body physics service
//!
//! The launch logic never reaches for a concrete engine. It talks to the
//! [`PhysicsWorld`] capability set, which the host injects:
//! - Bodies are created inside the world and referenced by [`BodyId`]
//! - Forces accumulate until the next step and are integrated exactly once
//! - Each step reports the collision pairs that began during it
//!
//! [`ArenaWorld`] is the built-in implementation and [`Runner`] drives it with
//! a fixed timestep, dispatching step events to subscribed listeners.

pub mod body;
pub mod collision;
pub mod runner;
#[cfg(test)]
pub(crate) mod testing;
pub mod world;

pub use body::{Body, BodyId, BodyOptions, Shape};
pub use collision::{CollisionResult, circle_circle_collision, circle_rect_collision, detect};
pub use runner::{EngineEvent, EngineListener, ListenerHandle, Runner};
pub use world::{ArenaWorld, CollisionPair, StepReport};

use glam::Vec2;

/// Operations the game needs from a physics engine
///
/// Calls that name a body which is no longer in the world are ignored.
pub trait PhysicsWorld {
    /// Create a circle body and add it to the world
    fn create_circle_body(&mut self, x: f32, y: f32, radius: f32, options: BodyOptions) -> BodyId;

    /// Create an axis-aligned rectangle body and add it to the world
    fn create_rectangle_body(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        options: BodyOptions,
    ) -> BodyId;

    /// Re-insert a previously detached body, returning its id
    fn add_body(&mut self, body: Body) -> BodyId;

    /// Detach a body from the world, handing it back to the caller
    fn remove_body(&mut self, id: BodyId) -> Option<Body>;

    /// Read-only view of a body's latest simulated state
    fn body(&self, id: BodyId) -> Option<&Body>;

    /// Add a force to be integrated on the next step
    fn apply_force(&mut self, id: BodyId, at_point: Vec2, force: Vec2);

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2);

    fn set_position(&mut self, id: BodyId, position: Vec2);

    /// Freeze or release a body; static bodies are skipped by the integrator
    fn set_static(&mut self, id: BodyId, is_static: bool);

    /// Advance the simulation by `dt_ms` milliseconds
    fn step(&mut self, dt_ms: f32) -> StepReport;

    /// All bodies currently in the world, ordered by id
    fn bodies(&self) -> &[Body];
}
