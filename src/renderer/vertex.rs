//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scale a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.93, 0.95, 0.98, 1.0];
    pub const GROUND: [f32; 4] = [0.35, 0.55, 0.3, 1.0];
    pub const TARGET: [f32; 4] = [0.85, 0.2, 0.25, 1.0];
    pub const BALL: [f32; 4] = [0.2, 0.35, 0.8, 1.0];
    /// Other dynamic bodies
    pub const BODY: [f32; 4] = [0.5, 0.5, 0.55, 1.0];
    pub const FORECAST_DOT: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

    /// Basketball palette, used when the ball names a sprite
    pub const BASKETBALL: [f32; 4] = [0.93, 0.47, 0.13, 1.0];
    pub const BASKETBALL_SEAM: [f32; 4] = [0.15, 0.08, 0.04, 1.0];
}
