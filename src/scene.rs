//! Contracts the rendering backend fulfils
//!
//! The simulation never talks to a renderer directly. The frame driver asks a
//! [`SceneBackend`] for one [`PlatformHandle`] per platform slot, pushes the
//! platform transforms into those handles and then asks for a render.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::sim::{GameSession, MaterialClass};

/// Renderable object bound to one platform slot
pub trait PlatformHandle {
    fn set_position(&mut self, position: Vec3);
    fn set_scale(&mut self, scale: Vec3);
    fn set_material(&mut self, material: MaterialClass);
}

/// Character animation playback
pub trait AnimationClock {
    fn advance(&mut self, dt: f32);
}

/// Scene/rendering collaborator
pub trait SceneBackend {
    type Handle: PlatformHandle;

    /// Create the renderable for platform slot `index`
    fn create_platform(&mut self, index: usize) -> Self::Handle;

    /// Draw the current frame
    fn render(&mut self, session: &GameSession);

    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Transform of a platform as the backend sees it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlatformQuad {
    pub position: Vec3,
    pub scale: Vec3,
    pub material: MaterialClass,
}

impl PlatformHandle for PlatformQuad {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    fn set_material(&mut self, material: MaterialClass) {
        self.material = material;
    }
}

/// Quad shared between the frame driver (writer) and a backend (reader)
pub type SharedPlatform = Rc<RefCell<PlatformQuad>>;

impl PlatformHandle for SharedPlatform {
    fn set_position(&mut self, position: Vec3) {
        self.borrow_mut().position = position;
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.borrow_mut().scale = scale;
    }

    fn set_material(&mut self, material: MaterialClass) {
        self.borrow_mut().material = material;
    }
}

/// Backend that draws nothing, used by tests and the native demo
#[derive(Debug, Default)]
pub struct HeadlessScene {
    platforms: Vec<SharedPlatform>,
    pub frames_rendered: u64,
    pub viewport: (u32, u32),
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every platform handle created so far
    pub fn platforms(&self) -> Vec<PlatformQuad> {
        self.platforms.iter().map(|p| *p.borrow()).collect()
    }
}

impl SceneBackend for HeadlessScene {
    type Handle = SharedPlatform;

    fn create_platform(&mut self, index: usize) -> SharedPlatform {
        log::debug!("Created platform handle {index}");
        let handle = SharedPlatform::default();
        self.platforms.push(handle.clone());
        handle
    }

    fn render(&mut self, _session: &GameSession) {
        self.frames_rendered += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }
}
