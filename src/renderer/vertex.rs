//! Vertex types for the side-view renderer

use bytemuck::{Pod, Zeroable};

/// 2D vertex in normalized device coordinates with a color
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

/// Fallback colors when the manifest carries no tint
pub mod colors {
    pub const SKY: [f32; 4] = [0.55, 0.75, 0.95, 1.0];
    pub const CITY: [f32; 4] = [0.35, 0.4, 0.55, 1.0];
    pub const CITY_ALT: [f32; 4] = [0.3, 0.34, 0.48, 1.0];
    pub const BUILDING: [f32; 4] = [0.45, 0.3, 0.25, 1.0];
    pub const HALF_BUILDING: [f32; 4] = [0.5, 0.4, 0.3, 1.0];
    pub const ROOF: [f32; 4] = [0.2, 0.2, 0.22, 1.0];
    pub const PLAYER: [f32; 4] = [0.95, 0.75, 0.2, 1.0];
    pub const DEATH_PLANE: [f32; 4] = [1.0, 0.0, 0.0, 0.6];
}
