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

/// Colors for scene elements
pub mod colors {
    /// Body fill colors, cycled by body index
    pub const BODIES: [[f32; 4]; 4] = [
        [0.95, 0.35, 0.30, 1.0],
        [0.25, 0.55, 0.95, 1.0],
        [0.30, 0.80, 0.45, 1.0],
        [0.95, 0.75, 0.25, 1.0],
    ];
    pub const HELD_OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const BACKGROUND: [f32; 4] = [0.96, 0.96, 0.97, 1.0];
}
