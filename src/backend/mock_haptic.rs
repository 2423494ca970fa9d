//! Mock haptic backend for testing.
//!
//! This backend logs and records haptic requests instead of sending them
//! to a device. Useful for testing the dispatcher and manager without
//! requiring a force-feedback wheel, and for dry runs of command scripts.

use crate::backend::{BackendError, HapticBackend};
use crate::config::VirtualDevice;
use crate::haptic::{ActivationRequest, HapticCaps, JoystickId, RumbleRequest};
use log::info;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct MockJoystick {
    name: String,
    caps: HapticCaps,
}

#[derive(Debug, Default)]
struct MockState {
    joysticks: HashMap<JoystickId, MockJoystick>,
    activations: Vec<ActivationRequest>,
    rumbles: Vec<RumbleRequest>,
    failing: bool,
}

/// Mock haptic backend that logs and records requests.
///
/// Clones share the same recorded state.
#[derive(Clone, Debug, Default)]
pub struct MockHapticBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockHapticBackend {
    /// Create a new mock backend with no joysticks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock backend exposing the configured virtual devices.
    pub fn from_devices(devices: &[VirtualDevice]) -> Self {
        let backend = Self::new();
        for device in devices {
            backend.add_joystick(JoystickId(device.id), &device.name, device.caps());
        }
        backend
    }

    /// Builder form of [`MockHapticBackend::add_joystick`].
    pub fn with_joystick(self, joystick: JoystickId, name: &str, caps: HapticCaps) -> Self {
        self.add_joystick(joystick, name, caps);
        self
    }

    pub fn add_joystick(&self, joystick: JoystickId, name: &str, caps: HapticCaps) {
        self.lock().joysticks.insert(
            joystick,
            MockJoystick {
                name: name.to_string(),
                caps,
            },
        );
    }

    /// Make every subsequent request fail (after being recorded).
    ///
    /// Requests for unregistered joysticks always fail.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Activation requests received so far.
    pub fn activations(&self) -> Vec<ActivationRequest> {
        self.lock().activations.clone()
    }

    /// Rumble records delivered so far.
    pub fn rumbles(&self) -> Vec<RumbleRequest> {
        self.lock().rumbles.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HapticBackend for MockHapticBackend {
    fn joystick_name(&self, joystick: JoystickId) -> Option<String> {
        self.lock().joysticks.get(&joystick).map(|j| j.name.clone())
    }

    fn joystick_haptic(&self, joystick: JoystickId) -> HapticCaps {
        self.lock()
            .joysticks
            .get(&joystick)
            .map(|j| j.caps)
            .unwrap_or_default()
    }

    fn set_haptic(&self, request: &ActivationRequest) -> Result<(), BackendError> {
        info!("[MOCK HAPTIC] {} {:?}", request.joystick, request.effect);
        let mut state = self.lock();
        state.activations.push(*request);
        if !state.joysticks.contains_key(&request.joystick) {
            return Err(BackendError::UnknownJoystick(request.joystick));
        }
        if state.failing {
            return Err(BackendError::Operation("mock failure".into()));
        }
        Ok(())
    }

    fn rumble(&self, request: &RumbleRequest) -> Result<(), BackendError> {
        info!(
            "[MOCK HAPTIC] {} rumble weak={} strong={}",
            request.joystick, request.weak, request.strong
        );
        let mut state = self.lock();
        state.rumbles.push(*request);
        if !state.joysticks.contains_key(&request.joystick) {
            return Err(BackendError::UnknownJoystick(request.joystick));
        }
        if state.failing {
            return Err(BackendError::Operation("mock failure".into()));
        }
        Ok(())
    }
}
