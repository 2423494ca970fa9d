//! Logitech G920 rotation range override
//!
//! The G920 does not take its rotation range through the force-feedback
//! API. The kernel driver exposes it as a `range` attribute on the wheel's
//! hid node instead, so the new value is written there directly.

use crate::haptic::RANGE_ATTRIBUTE;
use crate::wheel::tree::{DeviceTree, TreeError};
use log::{debug, error, info, warn};

/// Outcome of one override attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeReport {
    /// G920 nodes found
    pub matched: usize,

    /// Nodes whose attribute write succeeded
    pub written: usize,
}

/// Write `degrees` to the range attribute of every attached G920.
///
/// Write failures and scan failures are ignored. Failing to open the
/// device tree at all terminates the process.
pub fn apply_range<T: DeviceTree + ?Sized>(tree: &T, degrees: u16) -> RangeReport {
    info!("Searching for Logitech G920 wheel...");

    let nodes = match tree.interface_nodes() {
        Ok(nodes) => nodes,
        Err(e @ TreeError::Scan(_)) => {
            warn!("{}", e);
            return RangeReport::default();
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let value = degrees.to_string();
    let mut report = RangeReport::default();

    for node in nodes.iter().filter(|node| node.is_g920()) {
        report.matched += 1;

        let serial = node
            .usb_parent
            .as_ref()
            .and_then(|parent| parent.serial.as_deref())
            .unwrap_or("unknown");
        info!("Logitech G920 identified with serial {}", serial);
        info!(
            "Current wheel range: {}",
            node.current_range.as_deref().unwrap_or("unknown")
        );
        info!("Setting wheel range to: {}", value);

        let path = node.range_path();
        match tree.write_attribute(&path, &value) {
            Ok(()) => report.written += 1,
            // Wrong driver version or wheel mid-reconnection
            Err(e) => debug!("Failed to write {} to {}: {}", RANGE_ATTRIBUTE, path.display(), e),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::memory::MemoryTree;
    use crate::wheel::tree::{InterfaceNode, UsbIdentity};
    use std::path::PathBuf;

    fn g920(path: &str) -> InterfaceNode {
        InterfaceNode::new(path).with_usb_parent(UsbIdentity::new(0x046D, 0xC262).with_serial("0001"))
    }

    #[test]
    fn test_every_match_is_written() {
        let tree = MemoryTree::new()
            .with_node(g920("/sys/hid/a"))
            .with_node(InterfaceNode::new("/sys/hid/b").with_usb_parent(UsbIdentity::new(0x045E, 0x028E)))
            .with_node(InterfaceNode::new("/sys/hid/c"))
            .with_node(g920("/sys/hid/d"));

        let report = apply_range(&tree, 540);

        assert_eq!(report, RangeReport { matched: 2, written: 2 });
        assert_eq!(
            tree.writes(),
            vec![
                (PathBuf::from("/sys/hid/a/range"), "540".to_string()),
                (PathBuf::from("/sys/hid/d/range"), "540".to_string()),
            ]
        );
        assert_eq!(tree.scans(), 1);
    }

    #[test]
    fn test_failed_write_does_not_stop_enumeration() {
        let tree = MemoryTree::new()
            .with_node(g920("/sys/hid/a"))
            .with_node(g920("/sys/hid/b"))
            .fail_writes_to("/sys/hid/a/range");

        let report = apply_range(&tree, 900);

        assert_eq!(report, RangeReport { matched: 2, written: 1 });
        assert_eq!(tree.writes().len(), 2);
    }

    #[test]
    fn test_no_wheel_attached() {
        let tree = MemoryTree::new().with_node(InterfaceNode::new("/sys/hid/a"));

        assert_eq!(apply_range(&tree, 270), RangeReport::default());
        assert!(tree.writes().is_empty());
    }

    #[test]
    fn test_scan_failure_finds_no_wheel() {
        let tree = MemoryTree::new()
            .with_node(g920("/sys/hid/a"))
            .fail_enumeration(TreeError::Scan("enumerate: no such subsystem".into()));

        assert_eq!(apply_range(&tree, 540), RangeReport::default());
        assert!(tree.writes().is_empty());
        assert_eq!(tree.scans(), 1);
    }

    #[test]
    fn test_every_request_rescans() {
        let tree = MemoryTree::new().with_node(g920("/sys/hid/a"));

        apply_range(&tree, 270);
        apply_range(&tree, 900);

        assert_eq!(tree.scans(), 2);
    }
}
