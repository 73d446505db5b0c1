//! Shape generation for the side view
//!
//! Everything is an axis-aligned rectangle facing the camera. Corners are
//! projected on the CPU so the shader only passes colors through.

use glam::{Vec2, Vec3};

use super::vertex::{Vertex, colors};
use crate::scene::PlatformQuad;
use crate::sim::BackgroundSegment;

/// Perspective mapping from world space to NDC for a camera looking down -z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub eye: Vec3,
    pub aspect: f32,
    pub tan_half_fov: f32,
}

impl Projection {
    pub const FOV_Y_DEGREES: f32 = 75.0;
    const NEAR: f32 = 0.1;

    pub fn new(eye: Vec3, width: u32, height: u32) -> Self {
        let aspect = if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        Self {
            eye,
            aspect,
            tan_half_fov: (Self::FOV_Y_DEGREES.to_radians() / 2.0).tan(),
        }
    }

    pub fn project(&self, p: Vec3) -> Vec2 {
        let depth = (self.eye.z - p.z).max(Self::NEAR);
        let half_h = depth * self.tan_half_fov;
        Vec2::new(
            (p.x - self.eye.x) / (half_h * self.aspect),
            (p.y - self.eye.y) / half_h,
        )
    }
}

/// Two triangles covering `min..max` (already in NDC)
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// World-space rectangle at depth `z`
pub fn rect(proj: &Projection, min: Vec2, max: Vec2, z: f32, color: [f32; 4]) -> [Vertex; 6] {
    let a = proj.project(min.extend(z));
    let b = proj.project(max.extend(z));
    quad(a, b, color)
}

const ROOF_THICKNESS: f32 = 0.15;

/// Building facade plus a darker roof strip
pub fn platform(proj: &Projection, platform: &PlatformQuad, color: [f32; 4]) -> Vec<Vertex> {
    let half = platform.scale * 0.5;
    let z = platform.position.z + half.z;
    let min = (platform.position - half).truncate();
    let max = (platform.position + half).truncate();
    let roof_min = Vec2::new(min.x, max.y - ROOF_THICKNESS);

    let mut vertices = Vec::with_capacity(12);
    vertices.extend(rect(proj, min, max, z, color));
    vertices.extend(rect(proj, roof_min, max, z, colors::ROOF));
    vertices
}

/// Tower heights (fraction of the segment height) used to fake a skyline
const TOWERS: [f32; 7] = [0.55, 0.72, 0.6, 0.85, 0.5, 0.78, 0.64];

/// One skyline tile; `index` varies the silhouette between tiles
pub fn skyline(
    proj: &Projection,
    segment: &BackgroundSegment,
    index: usize,
    color: [f32; 4],
) -> Vec<Vertex> {
    let scale = segment.scale;
    let left = segment.position.x - scale / 2.0;
    let bottom = segment.position.y - scale / 2.0;
    let width = scale / TOWERS.len() as f32;

    let mut vertices = Vec::with_capacity(TOWERS.len() * 6);
    for i in 0..TOWERS.len() {
        let height = TOWERS[(i + index * 3) % TOWERS.len()] * scale;
        let x0 = left + i as f32 * width;
        let tint = if i % 2 == 0 { color } else { colors::CITY_ALT };
        vertices.extend(rect(
            proj,
            Vec2::new(x0, bottom),
            Vec2::new(x0 + width, bottom + height),
            segment.position.z,
            tint,
        ));
    }
    vertices
}

/// The runner: a unit box standing on `y`
pub fn player(proj: &Projection, y: f32, color: [f32; 4]) -> [Vertex; 6] {
    rect(proj, Vec2::new(-0.5, y), Vec2::new(0.5, y + 1.0), 0.5, color)
}

/// Thin red strip marking the height where runs end
pub fn death_plane(proj: &Projection, y: f32) -> [Vertex; 6] {
    let span = 100.0;
    rect(
        proj,
        Vec2::new(proj.eye.x - span, y - 0.05),
        Vec2::new(proj.eye.x + span, y + 0.05),
        0.0,
        colors::DEATH_PLANE,
    )
}
