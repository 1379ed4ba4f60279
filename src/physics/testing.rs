//! Test double that records every mutating call made on a world

use glam::Vec2;

use super::{ArenaWorld, Body, BodyId, BodyOptions, PhysicsWorld, StepReport};

/// A mutating call, in the order it was made
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCall {
    CreateCircle { id: BodyId, position: Vec2, radius: f32 },
    CreateRect { id: BodyId },
    Add(BodyId),
    Remove(BodyId),
    ApplyForce { id: BodyId, at_point: Vec2, force: Vec2 },
    SetVelocity { id: BodyId, velocity: Vec2 },
    SetPosition { id: BodyId, position: Vec2 },
    SetStatic { id: BodyId, is_static: bool },
    Step,
}

/// `ArenaWorld` that remembers how it was driven
#[derive(Debug, Default)]
pub struct RecordingWorld {
    pub inner: ArenaWorld,
    pub calls: Vec<WorldCall>,
}

impl RecordingWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// A world without gravity, so bodies only move when told to
    pub fn weightless() -> Self {
        let mut world = Self::new();
        world.inner.gravity = Vec2::ZERO;
        world
    }

    pub fn forces(&self) -> Vec<Vec2> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                WorldCall::ApplyForce { force, .. } => Some(*force),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl PhysicsWorld for RecordingWorld {
    fn create_circle_body(&mut self, x: f32, y: f32, radius: f32, options: BodyOptions) -> BodyId {
        let id = self.inner.create_circle_body(x, y, radius, options);
        self.calls.push(WorldCall::CreateCircle {
            id,
            position: Vec2::new(x, y),
            radius,
        });
        id
    }

    fn create_rectangle_body(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        options: BodyOptions,
    ) -> BodyId {
        let id = self.inner.create_rectangle_body(x, y, width, height, options);
        self.calls.push(WorldCall::CreateRect { id });
        id
    }

    fn add_body(&mut self, body: Body) -> BodyId {
        let id = self.inner.add_body(body);
        self.calls.push(WorldCall::Add(id));
        id
    }

    fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        self.calls.push(WorldCall::Remove(id));
        self.inner.remove_body(id)
    }

    fn body(&self, id: BodyId) -> Option<&Body> {
        self.inner.body(id)
    }

    fn apply_force(&mut self, id: BodyId, at_point: Vec2, force: Vec2) {
        self.calls.push(WorldCall::ApplyForce { id, at_point, force });
        self.inner.apply_force(id, at_point, force);
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        self.calls.push(WorldCall::SetVelocity { id, velocity });
        self.inner.set_velocity(id, velocity);
    }

    fn set_position(&mut self, id: BodyId, position: Vec2) {
        self.calls.push(WorldCall::SetPosition { id, position });
        self.inner.set_position(id, position);
    }

    fn set_static(&mut self, id: BodyId, is_static: bool) {
        self.calls.push(WorldCall::SetStatic { id, is_static });
        self.inner.set_static(id, is_static);
    }

    fn step(&mut self, dt_ms: f32) -> StepReport {
        self.calls.push(WorldCall::Step);
        self.inner.step(dt_ms)
    }

    fn bodies(&self) -> &[Body] {
        self.inner.bodies()
    }
}
