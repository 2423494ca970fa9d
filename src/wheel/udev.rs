//! udev-backed device tree (Linux)
//!
//! Walks every node of the `hid` subsystem and resolves its USB device
//! parent. A fresh udev context is created per call and dropped before
//! returning.

use crate::haptic::{
    ATTR_PRODUCT_ID, ATTR_SERIAL, ATTR_VENDOR_ID, INTERFACE_SUBSYSTEM, RANGE_ATTRIBUTE,
    USB_DEVICE_DEVTYPE, USB_SUBSYSTEM,
};
use crate::wheel::tree::{DeviceTree, InterfaceNode, TreeError, UsbIdentity};
use log::trace;
use std::ffi::OsStr;

/// Device tree read through libudev
#[derive(Clone, Copy, Debug, Default)]
pub struct UdevTree;

impl DeviceTree for UdevTree {
    fn interface_nodes(&self) -> Result<Vec<InterfaceNode>, TreeError> {
        let context = libudev::Context::new().map_err(|e| TreeError::Init(e.to_string()))?;

        let mut enumerator =
            libudev::Enumerator::new(&context).map_err(|e| TreeError::Scan(e.to_string()))?;
        enumerator
            .match_subsystem(INTERFACE_SUBSYSTEM)
            .map_err(|e| TreeError::Scan(e.to_string()))?;

        let mut nodes = Vec::new();
        for device in enumerator
            .scan_devices()
            .map_err(|e| TreeError::Scan(e.to_string()))?
        {
            let Some(sys_path) = device.syspath() else {
                continue;
            };
            trace!("Sys node path: {}", sys_path.display());

            let mut node = InterfaceNode::new(sys_path);
            node.current_range = attribute(device.attribute_value(RANGE_ATTRIBUTE));

            // Closest ancestor that is the USB device itself, not one of its interfaces
            let mut parent = device.parent();
            while let Some(candidate) = parent {
                if candidate.subsystem() == Some(OsStr::new(USB_SUBSYSTEM))
                    && candidate.devtype() == Some(OsStr::new(USB_DEVICE_DEVTYPE))
                {
                    let vendor_id = hex_id(candidate.attribute_value(ATTR_VENDOR_ID));
                    let product_id = hex_id(candidate.attribute_value(ATTR_PRODUCT_ID));
                    if let (Some(vendor_id), Some(product_id)) = (vendor_id, product_id) {
                        node.usb_parent = Some(UsbIdentity {
                            vendor_id,
                            product_id,
                            serial: attribute(candidate.attribute_value(ATTR_SERIAL)),
                        });
                    }
                    break;
                }
                parent = candidate.parent();
            }

            nodes.push(node);
        }

        Ok(nodes)
    }
}

fn attribute(value: Option<&OsStr>) -> Option<String> {
    value
        .and_then(OsStr::to_str)
        .map(|s| s.trim().to_string())
}

/// Parse a sysfs id attribute such as `046d`
fn hex_id(value: Option<&OsStr>) -> Option<u16> {
    let text = value?.to_str()?;
    u16::from_str_radix(text.trim(), 16).ok()
}
