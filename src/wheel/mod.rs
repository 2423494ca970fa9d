//! Wheel rotation range support
//!
//! This module provides:
//! - Host device tree access (udev on Linux)
//! - The Logitech G920 range override through sysfs
//! - An in-memory tree for tests and dry runs

pub mod memory;
pub mod range;
pub mod tree;
#[cfg(target_os = "linux")]
pub mod udev;

// Re-export commonly used items
pub use memory::MemoryTree;
pub use range::{apply_range, RangeReport};
pub use tree::{DeviceTree, InterfaceNode, TreeError, UsbIdentity};
#[cfg(target_os = "linux")]
pub use udev::UdevTree;

/// Device tree stand-in for hosts without udev
#[cfg(not(target_os = "linux"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedTree;

#[cfg(not(target_os = "linux"))]
impl DeviceTree for UnsupportedTree {
    fn interface_nodes(&self) -> Result<Vec<InterfaceNode>, TreeError> {
        Err(TreeError::PlatformNotSupported)
    }
}

/// Get the device tree for the current platform
#[cfg(target_os = "linux")]
pub fn host_tree() -> UdevTree {
    UdevTree
}

/// Get the device tree for the current platform
#[cfg(not(target_os = "linux"))]
pub fn host_tree() -> UnsupportedTree {
    UnsupportedTree
}
