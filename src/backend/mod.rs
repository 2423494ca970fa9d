//! Backend abstraction for force-feedback output
//!
//! This module provides a unified interface for querying joysticks and
//! sending haptic effects to them, plus the queue used for rumble.

pub mod mock_haptic;
pub mod queue;

pub use mock_haptic::MockHapticBackend;
pub use queue::{rumble_queue, RumbleQueue};

use crate::haptic::{ActivationRequest, HapticCaps, JoystickId, RumbleRequest};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend operation failed: {0}")]
    Operation(String),

    #[error("Unknown joystick: {0}")]
    UnknownJoystick(JoystickId),
}

/// Unified backend interface for haptic operations
pub trait HapticBackend {
    /// Name reported by the input layer for a joystick
    fn joystick_name(&self, joystick: JoystickId) -> Option<String>;

    /// Haptic capabilities reported by the input layer for a joystick
    fn joystick_haptic(&self, joystick: JoystickId) -> HapticCaps;

    /// Apply a force-feedback effect immediately
    fn set_haptic(&self, request: &ActivationRequest) -> Result<(), BackendError>;

    /// Deliver a queued rumble record
    fn rumble(&self, request: &RumbleRequest) -> Result<(), BackendError>;
}
