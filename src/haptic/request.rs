//! Backend-facing records
//!
//! These are built fresh for every dispatched command and never stored.
//! Their `Display` form is the debug trace line.

use crate::haptic::types::{Condition, JoystickId};
use std::fmt;

/// Force-feedback effect applied synchronously by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Constant { level: i16 },
    Spring(Condition),
    Damper(Condition),
}

/// Activation request for one joystick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationRequest {
    pub joystick: JoystickId,
    pub effect: Activation,
}

impl ActivationRequest {
    pub fn new(joystick: JoystickId, effect: Activation) -> Self {
        Self { joystick, effect }
    }
}

/// Simple vibration record delivered through the rumble queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RumbleRequest {
    pub joystick: JoystickId,
    pub weak: u16,
    pub strong: u16,
}

impl fmt::Display for ActivationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.effect {
            Activation::Constant { level } => write!(f, "< CONSTANT, level: {}", level),
            Activation::Spring(c) => write!(
                f,
                "< SPRING, saturation: {} {}, coefficient: {} {}, center: {}, deadband: {}",
                c.saturation.left, c.saturation.right,
                c.coefficient.left, c.coefficient.right,
                c.center, c.deadband
            ),
            Activation::Damper(c) => write!(
                f,
                "< DAMPER, saturation: {} {}, coefficient: {} {}, center: {}, deadband: {}",
                c.saturation.left, c.saturation.right,
                c.coefficient.left, c.coefficient.right,
                c.center, c.deadband
            ),
        }
    }
}

impl fmt::Display for RumbleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "< RUMBLE, weak={}, strong={}", self.weak, self.strong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptic::types::Pair;

    #[test]
    fn test_trace_lines() {
        let constant = ActivationRequest::new(JoystickId(0), Activation::Constant { level: -1200 });
        assert_eq!(constant.to_string(), "< CONSTANT, level: -1200");

        let spring = ActivationRequest::new(
            JoystickId(0),
            Activation::Spring(Condition {
                saturation: Pair::new(100, 100),
                coefficient: Pair::new(50, -50),
                center: 0,
                deadband: 5,
            }),
        );
        assert_eq!(
            spring.to_string(),
            "< SPRING, saturation: 100 100, coefficient: 50 -50, center: 0, deadband: 5"
        );

        let rumble = RumbleRequest { joystick: JoystickId(1), weak: 10, strong: 20 };
        assert_eq!(rumble.to_string(), "< RUMBLE, weak=10, strong=20");
    }
}
