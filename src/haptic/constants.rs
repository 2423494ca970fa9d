//! Haptic sink constants
//!
//! Device identification values for the wheel whose rotation range is set
//! through sysfs, host device tree names, and user-facing message templates.

/// Sink name reported in logs
pub const SINK_NAME: &str = "haptic_sink_os";

/// Joystick name reported by the input layer for the Logitech G920
pub const G920_NAME: &str = "Logitech G920 Driving Force Racing Wheel";

/// Logitech USB vendor ID
pub const LOGITECH_VENDOR_ID: u16 = 0x046D;

/// Logitech G920 (Xbox/PC) USB product ID
pub const G920_PRODUCT_ID: u16 = 0xC262;

/// Subsystem enumerated when looking for wheel interface nodes
pub const INTERFACE_SUBSYSTEM: &str = "hid";

/// Subsystem and devtype of the physical USB parent of an interface node
pub const USB_SUBSYSTEM: &str = "usb";
pub const USB_DEVICE_DEVTYPE: &str = "usb_device";

/// USB device attributes
pub const ATTR_VENDOR_ID: &str = "idVendor";
pub const ATTR_PRODUCT_ID: &str = "idProduct";
pub const ATTR_SERIAL: &str = "serial";

/// Rotation range attribute exposed by the wheel driver on the interface node
pub const RANGE_ATTRIBUTE: &str = "range";

// Message templates, `{}` is replaced by the range in degrees.
pub const MSG_RANGE_ADJUSTED: &str = "wheel range adjusted to {} degrees";
pub const MSG_ADJUST_RANGE: &str = "adjust your wheel range to {} degrees";
