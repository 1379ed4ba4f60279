//! Rigid bodies owned by the physics world

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identifier for a body inside a world
///
/// Ids are never reused, so a handle to a removed body stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned rectangle, centered on the body position
    Rect { half_extents: Vec2 },
}

impl Shape {
    pub fn area(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => PI * radius * radius,
            Shape::Rect { half_extents } => 4.0 * half_extents.x * half_extents.y,
        }
    }

    /// Circle radius, or the rectangle's bounding radius
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Rect { half_extents } => half_extents.length(),
        }
    }
}

/// Creation options for a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyOptions {
    /// Free-form tag read by collision consumers ("ball", "target", ...)
    pub label: String,
    pub is_static: bool,
    /// Bounciness, 0 = no bounce, 1 = perfectly elastic
    pub restitution: f32,
    /// Tangential friction applied on contact
    pub friction: f32,
    /// Linear damping (air friction), fraction of velocity lost per base step
    pub friction_air: f32,
    /// Mass per unit area
    pub density: f32,
    /// Texture the renderer should use for this body, if any
    pub sprite: Option<String>,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            label: "body".to_string(),
            is_static: false,
            restitution: 0.0,
            friction: 0.1,
            friction_air: 0.01,
            density: 0.001,
            sprite: None,
        }
    }
}

impl BodyOptions {
    pub fn labeled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }
}

/// A rigid body
///
/// Velocity is expressed in world units per base step, like the force and
/// damping semantics of the world that integrates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub label: String,
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Force accumulated for the next step (cleared after integration)
    pub force: Vec2,
    pub mass: f32,
    pub friction_air: f32,
    pub friction: f32,
    pub restitution: f32,
    pub is_static: bool,
    pub sprite: Option<String>,
}

impl Body {
    pub fn new(id: BodyId, position: Vec2, shape: Shape, options: BodyOptions) -> Self {
        Self {
            id,
            label: options.label,
            shape,
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            mass: options.density * shape.area(),
            friction_air: options.friction_air,
            friction: options.friction,
            restitution: options.restitution,
            is_static: options.is_static,
            sprite: options.sprite,
        }
    }

    /// Inverse mass, zero for static bodies
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub fn radius(&self) -> f32 {
        self.shape.bounding_radius()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_mass_from_density() {
        let body = Body::new(
            BodyId(1),
            Vec2::ZERO,
            Shape::Circle { radius: 20.0 },
            BodyOptions::default(),
        );
        assert!((body.mass - 0.001 * PI * 400.0).abs() < 1e-5);
    }

    #[test]
    fn test_static_body_has_no_inverse_mass() {
        let body = Body::new(
            BodyId(1),
            Vec2::ZERO,
            Shape::Rect {
                half_extents: Vec2::new(10.0, 60.0),
            },
            BodyOptions {
                is_static: true,
                ..BodyOptions::labeled("target")
            },
        );
        assert_eq!(body.inverse_mass(), 0.0);
        assert!(body.has_label("target"));
    }
}
