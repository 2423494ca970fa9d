//! haptic-sink: force-feedback translation layer
//!
//! This library converts device-independent haptic effect commands into
//! calls against a joystick backend, and sets the rotation range of
//! Logitech G920 wheels through sysfs.

pub mod backend;
pub mod config;
pub mod haptic;
pub mod manager;
pub mod sink;
pub mod wheel;

// Re-export commonly used items
pub use backend::{HapticBackend, MockHapticBackend, RumbleQueue};
pub use config::{Config, ConfigError};
pub use haptic::{EffectCommand, HapticCaps, JoystickId};
pub use manager::SinkManager;
pub use sink::{Dispatch, EffectDispatcher, HapticSink, SinkContext};
pub use wheel::{host_tree, DeviceTree};
