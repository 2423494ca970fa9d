//! Host device tree access
//!
//! A [`DeviceTree`] lists the interface nodes of the host and writes node
//! attributes. Nodes are re-read on every call since wheels may be plugged
//! or unplugged between requests.

use crate::haptic::{G920_PRODUCT_ID, LOGITECH_VENDOR_ID, RANGE_ATTRIBUTE};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TreeError {
    #[error("Can't create device tree context: {0}")]
    Init(String),

    #[error("Device tree scan failed: {0}")]
    Scan(String),

    #[error("Device tree not supported on this platform")]
    PlatformNotSupported,
}

/// Identity of the physical USB device an interface node belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial: Option<String>,
}

impl UsbIdentity {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            serial: None,
        }
    }

    pub fn with_serial(mut self, serial: &str) -> Self {
        self.serial = Some(serial.to_string());
        self
    }

    pub fn is_g920(&self) -> bool {
        self.vendor_id == LOGITECH_VENDOR_ID && self.product_id == G920_PRODUCT_ID
    }
}

/// One interface node under the enumerated subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceNode {
    /// sysfs path of the node
    pub sys_path: PathBuf,

    /// Physical USB parent, if the node has one
    pub usb_parent: Option<UsbIdentity>,

    /// Current value of the node's `range` attribute, if readable
    pub current_range: Option<String>,
}

impl InterfaceNode {
    pub fn new<P: Into<PathBuf>>(sys_path: P) -> Self {
        Self {
            sys_path: sys_path.into(),
            usb_parent: None,
            current_range: None,
        }
    }

    pub fn with_usb_parent(mut self, identity: UsbIdentity) -> Self {
        self.usb_parent = Some(identity);
        self
    }

    pub fn with_current_range(mut self, range: &str) -> Self {
        self.current_range = Some(range.to_string());
        self
    }

    /// Whether the node's USB parent is a Logitech G920
    pub fn is_g920(&self) -> bool {
        self.usb_parent.as_ref().is_some_and(UsbIdentity::is_g920)
    }

    /// Path of the node's range attribute
    pub fn range_path(&self) -> PathBuf {
        self.sys_path.join(RANGE_ATTRIBUTE)
    }
}

/// Read/write access to the host device tree
pub trait DeviceTree {
    /// Enumerate the interface nodes currently present.
    fn interface_nodes(&self) -> Result<Vec<InterfaceNode>, TreeError>;

    /// Write an attribute value.
    ///
    /// A short write is reported as an error.
    fn write_attribute(&self, path: &Path, value: &str) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(value.as_bytes())?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct EmptyTree;

    impl DeviceTree for EmptyTree {
        fn interface_nodes(&self) -> Result<Vec<InterfaceNode>, TreeError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_g920_identity() {
        assert!(UsbIdentity::new(0x046D, 0xC262).is_g920());
        assert!(!UsbIdentity::new(0x046D, 0xC24F).is_g920());
        assert!(!UsbIdentity::new(0x044F, 0xC262).is_g920());

        let orphan = InterfaceNode::new("/sys/devices/virtual/hid/0003:046D:C262.0001");
        assert!(!orphan.is_g920());
    }

    #[test]
    fn test_range_path() {
        let node = InterfaceNode::new("/sys/bus/hid/devices/0003:046D:C262.0004");
        assert_eq!(
            node.range_path(),
            PathBuf::from("/sys/bus/hid/devices/0003:046D:C262.0004/range")
        );
    }

    #[test]
    fn test_default_write_attribute() {
        let dir = std::env::temp_dir().join(format!("haptic-sink-tree-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("range");
        fs::write(&path, "900").unwrap();

        EmptyTree.write_attribute(&path, "540").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "540");

        // Missing parent directory
        assert!(EmptyTree.write_attribute(&dir.join("missing/range"), "540").is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
