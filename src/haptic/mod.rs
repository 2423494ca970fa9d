//! Haptic data model
//!
//! This module defines the effect commands received from upstream, the
//! capability bitmask of a joystick, and the translated records handed to
//! the backend.

pub mod constants;
pub mod request;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use request::*;
pub use types::*;
