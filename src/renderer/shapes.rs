//! Triangle-list generation for 2D primitives
//!
//! Every function appends to a caller-owned buffer so a whole frame can be
//! built into one allocation.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Segment count that keeps circles smooth at the given radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(8, 64)
}

fn on_circle(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

fn push_quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    push_triangle(out, a, b, c, color);
    push_triangle(out, a, c, d, color);
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = i as f32 / segments as f32 * TAU;
        let theta2 = (i + 1) as f32 / segments as f32 * TAU;
        push_triangle(
            out,
            center,
            on_circle(center, radius, theta1),
            on_circle(center, radius, theta2),
            color,
        );
    }
}

/// Hollow circle band between two radii
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    out.reserve((segments * 6) as usize);
    for i in 0..segments {
        let theta1 = i as f32 / segments as f32 * TAU;
        let theta2 = (i + 1) as f32 / segments as f32 * TAU;
        push_quad(
            out,
            [
                on_circle(center, inner_radius, theta1),
                on_circle(center, outer_radius, theta1),
                on_circle(center, outer_radius, theta2),
                on_circle(center, inner_radius, theta2),
            ],
            color,
        );
    }
}

/// Axis-aligned rectangle centered on `center`
pub fn rect(out: &mut Vec<Vertex>, center: Vec2, half_extents: Vec2, color: [f32; 4]) {
    let min = center - half_extents;
    let max = center + half_extents;
    push_quad(
        out,
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        color,
    );
}

/// Thick line segment
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let side = dir.perp() * (width / 2.0);
    push_quad(out, [from + side, to + side, to - side, from - side], color);
}
