//! WebGPU rendering module
//!
//! A flat side view: skyline tiles, building facades and the runner as
//! colored quads. Materials only contribute their tint.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::Projection;
pub use vertex::{Vertex, colors};

use glam::Vec3;

use crate::assets::{CITY, CRATE, MaterialHandle, Resources};
use crate::scene::{PlatformQuad, SceneBackend, SharedPlatform};
use crate::sim::{GameSession, MaterialClass};

/// Colors resolved from the loaded materials
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub city: [f32; 4],
    pub building: [f32; 4],
    pub half_building: [f32; 4],
    pub player: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            city: colors::CITY,
            building: colors::BUILDING,
            half_building: colors::HALF_BUILDING,
            player: colors::PLAYER,
        }
    }
}

impl Palette {
    pub fn from_resources(resources: &Resources) -> Self {
        let defaults = Self::default();
        let tint = |handle: Option<&MaterialHandle>, fallback| {
            handle.and_then(|m| m.color).unwrap_or(fallback)
        };
        Self {
            city: tint(resources.material(CITY), defaults.city),
            building: tint(resources.building(MaterialClass::Full), defaults.building),
            half_building: tint(
                resources.building(MaterialClass::Half),
                defaults.half_building,
            ),
            player: tint(resources.material(CRATE), defaults.player),
        }
    }

    pub fn building(&self, material: MaterialClass) -> [f32; 4] {
        match material {
            MaterialClass::Full => self.building,
            MaterialClass::Half => self.half_building,
        }
    }
}

/// Build the vertex list for one frame
pub fn build_scene(
    session: &GameSession,
    platforms: &[PlatformQuad],
    palette: &Palette,
    size: (u32, u32),
) -> Vec<Vertex> {
    let camera = Vec3::new(session.camera.x, session.camera.y, session.camera.z);
    let proj = Projection::new(camera, size.0, size.1);

    let mut vertices = Vec::new();
    if !session.debug.hide_background {
        for (i, segment) in session.world.backgrounds().iter().enumerate() {
            vertices.extend(shapes::skyline(&proj, segment, i, palette.city));
        }
    }
    for quad in platforms {
        vertices.extend(shapes::platform(&proj, quad, palette.building(quad.material)));
    }
    if session.debug.show_death_plane {
        vertices.extend(shapes::death_plane(&proj, session.tuning.death_plane_y));
    }
    vertices.extend(shapes::player(&proj, session.player.y, palette.player));
    vertices
}

/// wgpu backend for the browser
pub struct WebRenderer {
    state: RenderState,
    platforms: Vec<SharedPlatform>,
    palette: Palette,
}

impl WebRenderer {
    pub fn new(state: RenderState, palette: Palette) -> Self {
        Self {
            state,
            platforms: Vec::new(),
            palette,
        }
    }
}

impl SceneBackend for WebRenderer {
    type Handle = SharedPlatform;

    fn create_platform(&mut self, _index: usize) -> SharedPlatform {
        let handle = SharedPlatform::default();
        self.platforms.push(handle.clone());
        handle
    }

    fn render(&mut self, session: &GameSession) {
        let quads: Vec<PlatformQuad> = self.platforms.iter().map(|p| *p.borrow()).collect();
        let vertices = build_scene(session, &quads, &self.palette, self.state.size);
        match self.state.render(&vertices) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => {
                self.state.resize(self.state.size.0, self.state.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.state.resize(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ResourceManifest;
    use crate::config::{DebugConfig, Tuning};
    use crate::sim::SeedPolicy;

    #[test]
    fn test_palette_uses_manifest_tints() {
        let manifest = ResourceManifest::from_json(
            r##"{
                "CITY": { "url": "c.png", "color": "#000000" },
                "BUILDING": { "url": "b.png" },
                "CRATE": { "url": "crate.png", "color": "#ff0000" }
            }"##,
        )
        .expect("manifest");
        let palette = Palette::from_resources(&Resources::load(&manifest).expect("load"));
        assert_eq!(palette.city, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(palette.building, colors::BUILDING);
        assert_eq!(palette.player, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_player_quad_uses_palette_tint() {
        let session =
            GameSession::new(Tuning::default(), DebugConfig::default(), SeedPolicy::Fixed(1));
        let palette = Palette {
            player: [0.0, 1.0, 0.0, 1.0],
            ..Palette::default()
        };
        let vertices = build_scene(&session, &[], &palette, (800, 600));
        let player = &vertices[vertices.len() - 6..];
        assert!(player.iter().all(|v| v.color == palette.player));
    }

    #[test]
    fn test_scene_vertex_count() {
        let mut session =
            GameSession::new(Tuning::default(), DebugConfig::default(), SeedPolicy::Fixed(1));
        let quads: Vec<PlatformQuad> = session
            .world
            .platforms()
            .iter()
            .map(|p| PlatformQuad {
                position: p.position,
                scale: p.size,
                material: p.material,
            })
            .collect();
        let palette = Palette::default();
        let plain = build_scene(&session, &quads, &palette, (800, 600));
        // 4 skyline tiles of 7 towers, 8 buildings with roofs, 1 player
        assert_eq!(plain.len(), (4 * 7 + 8 * 2 + 1) * 6);

        session.debug.show_death_plane = true;
        let debug = build_scene(&session, &quads, &palette, (800, 600));
        assert_eq!(debug.len(), plain.len() + 6);

        session.debug.hide_background = true;
        let bare = build_scene(&session, &quads, &palette, (800, 600));
        assert_eq!(bare.len(), debug.len() - 4 * 7 * 6);
    }
}
