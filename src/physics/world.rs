//! Built-in physics world
//!
//! Follows the force/velocity conventions of the JavaScript engine the game
//! was tuned against: world y grows downward, gravity is applied as a force
//! scaled by `GRAVITY_SCALE`, forces are integrated once with `dt²` (dt in
//! milliseconds) and velocities are measured per base step.

use std::collections::BTreeSet;

use glam::Vec2;

use super::PhysicsWorld;
use super::body::{Body, BodyId, BodyOptions, Shape};
use super::collision::detect;
use crate::consts::SIM_DT_MS;

/// Default gravity direction and magnitude
pub const GRAVITY: Vec2 = Vec2::new(0.0, 1.0);
/// Gravity is multiplied by this before being applied as a force
pub const GRAVITY_SCALE: f32 = 0.001;
/// Normal speeds below this come to rest instead of bouncing
pub const RESTING_SPEED: f32 = 0.5;

/// A pair of bodies in contact, ordered so that `body_a < body_b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionPair {
    pub body_a: BodyId,
    pub body_b: BodyId,
}

impl CollisionPair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b {
            Self { body_a: a, body_b: b }
        } else {
            Self { body_a: b, body_b: a }
        }
    }

    pub fn involves(&self, id: BodyId) -> bool {
        self.body_a == id || self.body_b == id
    }

    /// The partner of `id` in this pair
    pub fn other(&self, id: BodyId) -> Option<BodyId> {
        if self.body_a == id {
            Some(self.body_b)
        } else if self.body_b == id {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// What happened during one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Pairs that started touching this step
    pub collisions_started: Vec<CollisionPair>,
}

/// Rigid-body world with circles and axis-aligned boxes
#[derive(Debug, Clone)]
pub struct ArenaWorld {
    /// Bodies sorted by id for deterministic iteration
    bodies: Vec<Body>,
    pub gravity: Vec2,
    pub gravity_scale: f32,
    /// Pairs in contact at the end of the previous step
    active_pairs: BTreeSet<CollisionPair>,
    next_id: u32,
}

impl Default for ArenaWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaWorld {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            gravity: GRAVITY,
            gravity_scale: GRAVITY_SCALE,
            active_pairs: BTreeSet::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        match self.index_of(id) {
            Some(i) => Some(&mut self.bodies[i]),
            None => {
                log::debug!("Ignoring operation on missing body {:?}", id);
                None
            }
        }
    }

    fn insert(&mut self, body: Body) -> BodyId {
        let id = body.id;
        let pos = self.bodies.partition_point(|b| b.id < id);
        self.bodies.insert(pos, body);
        id
    }

    /// Apply gravity, integrate velocities and positions, clear forces
    fn integrate(&mut self, dt_ms: f32) {
        let ratio = dt_ms / SIM_DT_MS;
        let dt_sq = dt_ms * dt_ms;
        let gravity = self.gravity * self.gravity_scale;

        for body in self.bodies.iter_mut() {
            if body.is_static {
                body.force = Vec2::ZERO;
                continue;
            }
            body.force += gravity * body.mass;

            let damping = (1.0 - body.friction_air * ratio).max(0.0);
            body.velocity = body.velocity * damping + body.force / body.mass * dt_sq;
            body.position += body.velocity * ratio;
            body.force = Vec2::ZERO;
        }
    }

    /// Detect and resolve contacts, returning every pair currently touching
    fn resolve_contacts(&mut self) -> BTreeSet<CollisionPair> {
        let mut touching = BTreeSet::new();
        let count = self.bodies.len();

        for i in 0..count {
            for j in (i + 1)..count {
                if self.bodies[i].is_static && self.bodies[j].is_static {
                    continue;
                }
                let Some(result) = detect(&self.bodies[i], &self.bodies[j]) else {
                    continue;
                };
                if !result.hit {
                    continue;
                }
                touching.insert(CollisionPair::new(self.bodies[i].id, self.bodies[j].id));

                let (left, right) = self.bodies.split_at_mut(j);
                resolve_pair(&mut left[i], &mut right[0], result.normal, result.penetration);
            }
        }

        touching
    }
}

/// Separate two bodies and exchange momentum along `normal` (pointing from `b` to `a`)
fn resolve_pair(a: &mut Body, b: &mut Body, normal: Vec2, penetration: f32) {
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_total = inv_a + inv_b;
    if inv_total <= 0.0 {
        return;
    }

    // Position correction, split by inverse mass
    a.position += normal * penetration * (inv_a / inv_total);
    b.position -= normal * penetration * (inv_b / inv_total);

    let relative = a.velocity - b.velocity;
    let normal_speed = relative.dot(normal);
    if normal_speed >= 0.0 {
        return; // Already separating
    }

    let restitution = if -normal_speed < RESTING_SPEED {
        0.0
    } else {
        a.restitution.max(b.restitution)
    };
    let impulse = -(1.0 + restitution) * normal_speed / inv_total;
    a.velocity += normal * impulse * inv_a;
    b.velocity -= normal * impulse * inv_b;

    // Coulomb-free tangential friction: bleed off a share of sliding speed
    let friction = a.friction.min(b.friction);
    let tangent = relative - normal * normal_speed;
    a.velocity -= tangent * friction * (inv_a / inv_total);
    b.velocity += tangent * friction * (inv_b / inv_total);
}

impl PhysicsWorld for ArenaWorld {
    fn create_circle_body(&mut self, x: f32, y: f32, radius: f32, options: BodyOptions) -> BodyId {
        let id = self.allocate_id();
        let body = Body::new(id, Vec2::new(x, y), Shape::Circle { radius }, options);
        self.insert(body)
    }

    fn create_rectangle_body(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        options: BodyOptions,
    ) -> BodyId {
        let id = self.allocate_id();
        let shape = Shape::Rect {
            half_extents: Vec2::new(width / 2.0, height / 2.0),
        };
        let body = Body::new(id, Vec2::new(x, y), shape, options);
        self.insert(body)
    }

    fn add_body(&mut self, mut body: Body) -> BodyId {
        if self.index_of(body.id).is_some() || body.id.0 == 0 {
            body.id = self.allocate_id();
        } else {
            self.next_id = self.next_id.max(body.id.0 + 1);
        }
        self.insert(body)
    }

    fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let index = self.index_of(id)?;
        self.active_pairs.retain(|pair| !pair.involves(id));
        Some(self.bodies.remove(index))
    }

    fn body(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    fn apply_force(&mut self, id: BodyId, _at_point: Vec2, force: Vec2) {
        // Circles only: off-center application would add torque, which the arena ignores
        if let Some(body) = self.body_mut(id) {
            body.force += force;
        }
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.velocity = velocity;
        }
    }

    fn set_position(&mut self, id: BodyId, position: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.position = position;
        }
    }

    fn set_static(&mut self, id: BodyId, is_static: bool) {
        if let Some(body) = self.body_mut(id) {
            body.is_static = is_static;
        }
    }

    fn step(&mut self, dt_ms: f32) -> StepReport {
        self.integrate(dt_ms);
        let touching = self.resolve_contacts();

        let collisions_started = touching
            .difference(&self.active_pairs)
            .copied()
            .collect();
        self.active_pairs = touching;

        StepReport { collisions_started }
    }

    fn bodies(&self) -> &[Body] {
        &self.bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_options() -> BodyOptions {
        BodyOptions {
            restitution: 0.93,
            ..BodyOptions::labeled("ball")
        }
    }

    fn ground_options() -> BodyOptions {
        BodyOptions {
            is_static: true,
            ..BodyOptions::labeled("ground")
        }
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut world = ArenaWorld::new();
        let ball = world.create_circle_body(100.0, 100.0, 20.0, ball_options());

        world.step(SIM_DT_MS);
        let body = world.body(ball).unwrap();
        assert!(body.velocity.y > 0.0);
        assert!(body.position.y > 100.0);
        assert_eq!(body.position.x, 100.0);
    }

    #[test]
    fn test_force_integrates_once() {
        let mut world = ArenaWorld::new();
        world.gravity = Vec2::ZERO;
        let ball = world.create_circle_body(0.0, 0.0, 20.0, ball_options());
        let mass = world.body(ball).unwrap().mass;

        world.apply_force(ball, Vec2::ZERO, Vec2::new(0.015, 0.0));
        world.step(SIM_DT_MS);
        let expected = 0.015 / mass * SIM_DT_MS * SIM_DT_MS;
        let v1 = world.body(ball).unwrap().velocity.x;
        assert!((v1 - expected).abs() < 1e-4);
        assert_eq!(world.body(ball).unwrap().force, Vec2::ZERO);

        // Second step only applies air friction
        world.step(SIM_DT_MS);
        let v2 = world.body(ball).unwrap().velocity.x;
        assert!((v2 - v1 * 0.99).abs() < 1e-4);
    }

    #[test]
    fn test_static_body_does_not_move() {
        let mut world = ArenaWorld::new();
        let ball = world.create_circle_body(50.0, 50.0, 20.0, ball_options());
        world.set_static(ball, true);

        for _ in 0..10 {
            world.step(SIM_DT_MS);
        }
        assert_eq!(world.body(ball).unwrap().position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_ball_lands_on_ground() {
        let mut world = ArenaWorld::new();
        world.create_rectangle_body(300.0, 600.0, 600.0, 50.0, ground_options());
        let ball = world.create_circle_body(300.0, 400.0, 20.0, ball_options());

        for _ in 0..1200 {
            world.step(SIM_DT_MS);
        }
        let body = world.body(ball).unwrap();
        // Resting on the top face (y = 575) give or take a little sink
        assert!(body.position.y <= 556.0, "ball sank to {}", body.position.y);
        assert!(body.position.y > 540.0, "ball floated at {}", body.position.y);
    }

    #[test]
    fn test_collision_start_reported_once() {
        let mut world = ArenaWorld::new();
        world.gravity = Vec2::ZERO;
        let ground = world.create_rectangle_body(0.0, 0.0, 100.0, 10.0, ground_options());
        let ball = world.create_circle_body(0.0, -14.0, 10.0, ball_options());

        let report = world.step(SIM_DT_MS);
        assert_eq!(report.collisions_started, vec![CollisionPair::new(ground, ball)]);

        // Still touching (pushed out to exactly the surface, then nudged back in)
        world.set_position(ball, Vec2::new(0.0, -14.0));
        let report = world.step(SIM_DT_MS);
        assert!(report.collisions_started.is_empty());
    }

    #[test]
    fn test_remove_and_add_body() {
        let mut world = ArenaWorld::new();
        let ball = world.create_circle_body(0.0, 0.0, 20.0, ball_options());
        let removed = world.remove_body(ball).unwrap();
        assert!(world.body(ball).is_none());
        assert!(world.remove_body(ball).is_none());

        let id = world.add_body(removed);
        assert_eq!(id, ball);
        assert_eq!(world.bodies().len(), 1);

        let fresh = world.create_circle_body(0.0, 0.0, 20.0, ball_options());
        assert!(fresh > ball);
    }

    #[test]
    fn test_operations_on_missing_body_are_ignored() {
        let mut world = ArenaWorld::new();
        let ghost = BodyId(42);
        world.apply_force(ghost, Vec2::ZERO, Vec2::ONE);
        world.set_velocity(ghost, Vec2::ONE);
        world.set_static(ghost, true);
        assert!(world.body(ghost).is_none());
    }

    #[test]
    fn test_collision_pair_ordering() {
        let pair = CollisionPair::new(BodyId(7), BodyId(3));
        assert_eq!(pair.body_a, BodyId(3));
        assert_eq!(pair.other(BodyId(3)), Some(BodyId(7)));
        assert_eq!(pair.other(BodyId(9)), None);
    }
}
