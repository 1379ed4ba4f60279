//! Collision detection for circles and boxes
//!
//! Only dynamic circles move in the arena, so every test is circle vs
//! something: another circle or an axis-aligned rectangle.

use glam::Vec2;

use super::body::{Body, Shape};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Surface normal at contact, pointing from the other shape toward the circle
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a circle and an axis-aligned rectangle
pub fn circle_rect_collision(
    center: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let local = center - rect_center;
    let clamped = local.clamp(-half_extents, half_extents);

    if clamped != local {
        // Circle center outside the box: nearest point on the boundary
        let closest = rect_center + clamped;
        let offset = center - closest;
        let dist = offset.length();
        if dist >= radius {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center inside the box (tunneling) - push out through the nearest face
    let to_x = half_extents.x - local.x.abs();
    let to_y = half_extents.y - local.y.abs();
    let (normal, depth) = if to_x < to_y {
        (Vec2::new(local.x.signum(), 0.0), to_x)
    } else {
        (Vec2::new(0.0, local.y.signum()), to_y)
    };
    CollisionResult {
        hit: true,
        point: center - normal * depth,
        normal,
        penetration: depth + radius,
    }
}

/// Check collision between two circles (normal points from `b` toward `a`)
pub fn circle_circle_collision(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> CollisionResult {
    let offset = a - b;
    let dist = offset.length();
    let reach = radius_a + radius_b;
    if dist >= reach {
        return CollisionResult::miss();
    }
    let normal = if dist > 1e-6 { offset / dist } else { Vec2::NEG_Y };
    CollisionResult {
        hit: true,
        point: b + normal * radius_b,
        normal,
        penetration: reach - dist,
    }
}

/// Collide two bodies; `None` when neither is a circle
pub fn detect(a: &Body, b: &Body) -> Option<CollisionResult> {
    match (a.shape, b.shape) {
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => Some(circle_rect_collision(
            a.position,
            radius,
            b.position,
            half_extents,
        )),
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            let mut result = circle_rect_collision(b.position, radius, a.position, half_extents);
            result.normal = -result.normal;
            Some(result)
        }
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            Some(circle_circle_collision(a.position, ra, b.position, rb))
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_resting_on_box() {
        // Ground slab 600 wide centered at (300, 600), ball sitting just inside its top
        let result = circle_rect_collision(
            Vec2::new(300.0, 560.0),
            20.0,
            Vec2::new(300.0, 600.0),
            Vec2::new(300.0, 25.0),
        );
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_misses_box() {
        let result = circle_rect_collision(
            Vec2::new(100.0, 100.0),
            20.0,
            Vec2::new(540.0, 120.0),
            Vec2::new(10.0, 60.0),
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_hits_box_corner() {
        let result = circle_rect_collision(
            Vec2::new(10.0, 10.0),
            5.0,
            Vec2::ZERO,
            Vec2::new(7.0, 7.0),
        );
        assert!(result.hit);
        assert!(result.normal.x > 0.0 && result.normal.y > 0.0);
    }

    #[test]
    fn test_circle_center_inside_box_pushes_out_nearest_face() {
        let result = circle_rect_collision(
            Vec2::new(8.0, 0.0),
            2.0,
            Vec2::ZERO,
            Vec2::new(10.0, 30.0),
        );
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_circle() {
        let result = circle_circle_collision(Vec2::new(15.0, 0.0), 10.0, Vec2::ZERO, 10.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 5.0).abs() < 1e-4);

        let result = circle_circle_collision(Vec2::new(25.0, 0.0), 10.0, Vec2::ZERO, 10.0);
        assert!(!result.hit);
    }
}
