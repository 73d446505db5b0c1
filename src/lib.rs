//! Skyline Runner - an endless runner over a scrolling city
//!
//! Core modules:
//! - `sim`: Gameplay simulation (kinematics, collisions, world scroll, session phases)
//! - `platform`: Browser input mapping and frame timing
//! - `game`: Frame driver tying input, simulation, HUD and backend together
//! - `scene`: Contracts the rendering backend fulfils
//! - `assets`: Resource manifest parsing and material handles
//! - `hud`: Score, lives and message text
//! - `renderer`: WebGPU side-view renderer
//! - `config`: Data-driven game balance and debug switches

pub mod assets;
pub mod config;
pub mod error;
pub mod game;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod sim;

pub use config::{DebugConfig, DeviceClass, Tuning};
pub use error::GameError;
pub use game::Game;

/// Game configuration constants
pub mod consts {
    /// Platforms alive at any time
    pub const NUM_PLATFORMS: usize = 8;
    /// Platforms kept behind (left of) the player before recycling
    pub const PLATFORMS_TO_LEFT: usize = 4;
    /// Full platform length along x
    pub const PLATFORM_LENGTH: f32 = 6.0;
    /// Spacing added to the length to get the slot pitch
    pub const PLATFORM_GAP: f32 = 2.0;
    /// Platforms are tall buildings; only the roof matters for collisions
    pub const PLATFORM_HEIGHT: f32 = 30.0;
    /// Building centre so the canonical roof sits at y = -0.5
    pub const PLATFORM_CENTER_Y: f32 = -0.5 - PLATFORM_HEIGHT / 2.0;
    /// Roof height jitter range
    pub const PLATFORM_MIN_OFFSET: f32 = -1.5;
    pub const PLATFORM_MAX_OFFSET: f32 = 1.5;
    /// Width ratio range relative to `PLATFORM_LENGTH`
    pub const PLATFORM_MIN_RATIO: f32 = 0.35;
    pub const PLATFORM_MAX_RATIO: f32 = 1.0;
    /// Below this width/height ratio a building uses the half material
    pub const HALF_MATERIAL_RATIO: f32 = 0.15;

    /// Ground scroll speed (units/s) before the difficulty ramp
    pub const BASE_GROUND_SPEED: f32 = 9.0;
    /// Background moves slower than the ground for parallax
    pub const BG_SPEED_FACTOR: f32 = 0.75;
    /// Gravity applied while airborne (units/s²)
    pub const GRAVITY: f32 = 35.0;
    /// Velocity added by a jump (units/s)
    pub const JUMP_IMPULSE: f32 = 12.0;
    /// Falling to this height ends the run
    pub const DEATH_PLANE_Y: f32 = -10.0;
    /// Touch devices run slightly slower
    pub const TOUCH_SPEED_SCALE: f32 = 0.9;

    /// Score points per difficulty ramp half-cycle
    pub const RAMP_CYCLE: u64 = 25;
    /// Peak speed gain over base (desktop)
    pub const RAMP_MAX_GAIN: f32 = 0.6;
    /// Peak speed gain over base (touch)
    pub const RAMP_MAX_GAIN_TOUCH: f32 = 0.4;

    /// City skyline ring
    pub const NUM_CITY_SEGMENTS: usize = 4;
    pub const CITY_SEGMENTS_TO_LEFT: usize = 1;
    pub const CITY_SEGMENT_SCALE: f32 = 50.0;
    pub const CITY_SEGMENT_Z: f32 = -5.0;
    pub const CITY_SEGMENT_Y: f32 = -8.0;

    /// Camera rest offset
    pub const CAMERA_OFFSET_Y: f32 = 2.0;
    pub const CAMERA_OFFSET_Z: f32 = 15.0;
    /// Camera distance with the far-view debug switch
    pub const CAMERA_FAR_VIEW_Z: f32 = 150.0;
    /// Free-cam pan speed (units/s)
    pub const CAMERA_PAN_SPEED: f32 = 5.0;

    /// Lives shown on the HUD (never decremented)
    pub const START_LIVES: u32 = 3;

    /// Intro and game over message durations (seconds)
    pub const GET_READY_SECS: f32 = 1.0;
    pub const GO_SECS: f32 = 1.0;
    pub const GAME_OVER_SECS: f32 = 1.0;

    /// Replays allowed before the process must be restarted
    pub const MAX_REPLAYS: u32 = 10_000;

    /// Longest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Delta used for the very first frame
    pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;
}
