//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (delta clamping)
//! - Input events (key codes to actions)

pub mod clock;
pub mod input;

pub use clock::{FrameClock, FrameDelta};
pub use input::{Action, action_for_key};
