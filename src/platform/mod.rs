//! Platform abstraction layer
//!
//! Handles the browser side of the loop:
//! - Input events mapped to actions
//! - Frame timing from `requestAnimationFrame` timestamps

pub mod input;
pub mod time;

pub use input::{Action, ActionMapper, Binding, Trigger};
pub use time::FrameClock;
