//! Frame geometry: bodies plus forecast dots, in world coordinates

use glam::Vec2;

use super::overlay::Overlay;
use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::{BALL_LABEL, GROUND_LABEL, TARGET_LABEL};
use crate::physics::{Body, PhysicsWorld, Shape};

/// Fill colors by body role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStyle {
    pub ground: [f32; 4],
    pub target: [f32; 4],
    pub ball: [f32; 4],
    pub body: [f32; 4],
    pub dot: [f32; 4],
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            ground: colors::GROUND,
            target: colors::TARGET,
            ball: colors::BALL,
            body: colors::BODY,
            dot: colors::FORECAST_DOT,
        }
    }
}

impl SceneStyle {
    fn fill_for(&self, body: &Body) -> [f32; 4] {
        match body.label.as_str() {
            GROUND_LABEL => self.ground,
            TARGET_LABEL => self.target,
            BALL_LABEL => self.ball,
            _ => self.body,
        }
    }
}

/// Build the triangle list for one frame
///
/// Bodies are drawn in id order, the forecast on top.
pub fn build(world: &dyn PhysicsWorld, overlay: &Overlay, style: &SceneStyle) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(world.bodies().len() * 96 + overlay.dots().len() * 24);

    for body in world.bodies() {
        match body.shape {
            Shape::Rect { half_extents } => {
                shapes::rect(&mut out, body.position, half_extents, style.fill_for(body));
            }
            Shape::Circle { radius } if body.sprite.is_some() => {
                basketball(&mut out, body.position, radius);
            }
            Shape::Circle { radius } => {
                let segments = shapes::segments_for(radius);
                shapes::circle(&mut out, body.position, radius, style.fill_for(body), segments);
            }
        }
    }

    for dot in overlay.dots() {
        let color = with_alpha(style.dot, dot.opacity);
        shapes::circle(&mut out, dot.center, dot.radius, color, 8);
    }

    out
}

/// Sprite stand-in: orange ball with a dark rim and cross seams
fn basketball(out: &mut Vec<Vertex>, center: Vec2, radius: f32) {
    let segments = shapes::segments_for(radius);
    let seam = (radius * 0.08).max(1.0);

    shapes::circle(out, center, radius, colors::BASKETBALL, segments);
    shapes::ring(out, center, radius - seam, radius, colors::BASKETBALL_SEAM, segments);
    shapes::line(
        out,
        center - Vec2::X * radius,
        center + Vec2::X * radius,
        seam,
        colors::BASKETBALL_SEAM,
    );
    shapes::line(
        out,
        center - Vec2::Y * radius,
        center + Vec2::Y * radius,
        seam,
        colors::BASKETBALL_SEAM,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::TrajectoryCanvas;
    use crate::physics::{ArenaWorld, BodyOptions};

    fn world(sprite: Option<&str>) -> ArenaWorld {
        let mut world = ArenaWorld::new();
        world.create_rectangle_body(
            300.0,
            600.0,
            600.0,
            50.0,
            BodyOptions {
                is_static: true,
                ..BodyOptions::labeled(GROUND_LABEL)
            },
        );
        world.create_circle_body(
            70.0,
            530.0,
            20.0,
            BodyOptions {
                sprite: sprite.map(str::to_string),
                ..BodyOptions::labeled(BALL_LABEL)
            },
        );
        world
    }

    #[test]
    fn test_bodies_use_role_colors() {
        let style = SceneStyle::default();
        let vertices = build(&world(None), &Overlay::new(), &style);

        let segments = shapes::segments_for(20.0) as usize;
        assert_eq!(vertices.len(), 6 + segments * 3);
        assert_eq!(vertices[0].color, colors::GROUND);
        assert_eq!(vertices[6].color, colors::BALL);
    }

    #[test]
    fn test_sprite_ball_uses_basketball_palette() {
        let vertices = build(&world(Some("img/ball.png")), &Overlay::new(), &SceneStyle::default());
        assert!(vertices.iter().any(|v| v.color == colors::BASKETBALL));
        assert!(vertices.iter().any(|v| v.color == colors::BASKETBALL_SEAM));
        assert!(!vertices.iter().any(|v| v.color == colors::BALL));
    }

    #[test]
    fn test_page_setup_draws_basketball() {
        let arena = crate::Arena::new(&crate::GameConfig::page_default(), Overlay::new()).unwrap();
        let launcher = arena.launcher();
        let vertices = build(arena.world(), launcher.canvas(), &SceneStyle::default());
        assert!(vertices.iter().any(|v| v.color == colors::BASKETBALL));
    }

    #[test]
    fn test_dots_drawn_last_with_fading_alpha() {
        let mut overlay = Overlay::new();
        overlay.dot(Vec2::new(100.0, 100.0), 3.0, 1.0);
        overlay.dot(Vec2::new(110.0, 95.0), 3.0, 0.25);

        let style = SceneStyle::default();
        let vertices = build(&world(None), &overlay, &style);
        let tail = &vertices[vertices.len() - 48..];
        assert_eq!(tail[0].color[3], 1.0);
        assert_eq!(tail[47].color[3], 0.25);
    }
}
