//! Gameplay simulation
//!
//! All gameplay logic lives here. Nothing in this module touches the browser
//! or the GPU:
//! - Seeded RNG only, so a seed reproduces a layout
//! - Stable iteration order (by platform index)
//! - Rendering only sees the state through the scene contracts

pub mod collision;
pub mod difficulty;
pub mod rng;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Aabb, GroundHit, find_ground_collision, player_box, roof_contact};
pub use rng::{RunRng, SeedPolicy};
pub use state::{Camera, GamePhase, GameSession, IntroStage, Player};
pub use tick::{TickInput, TickReport, begin, step_player, tick};
pub use world::{BackgroundSegment, MaterialClass, Platform, World};
