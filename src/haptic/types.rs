//! Haptic type definitions
//!
//! Effect commands are a tagged sum type with one case per effect kind, each
//! carrying only the fields relevant to that kind.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque joystick handle from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoystickId(pub usize);

impl fmt::Display for JoystickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "joystick {}", self.0)
    }
}

bitflags! {
    /// Haptic capabilities of a joystick.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HapticCaps: u8 {
        const RUMBLE   = 0b0001;
        const CONSTANT = 0b0010;
        const SPRING   = 0b0100;
        const DAMPER   = 0b1000;
    }
}

impl HapticCaps {
    /// Every capability a sink can drive
    pub const SUPPORTED: Self = Self::RUMBLE
        .union(Self::CONSTANT)
        .union(Self::SPRING)
        .union(Self::DAMPER);
}

/// Named capability, as written in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Rumble,
    Constant,
    Spring,
    Damper,
}

impl From<Capability> for HapticCaps {
    fn from(capability: Capability) -> Self {
        match capability {
            Capability::Rumble => HapticCaps::RUMBLE,
            Capability::Constant => HapticCaps::CONSTANT,
            Capability::Spring => HapticCaps::SPRING,
            Capability::Damper => HapticCaps::DAMPER,
        }
    }
}

/// Left/right pair of a condition effect parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair<T> {
    pub left: T,
    pub right: T,
}

impl<T> Pair<T> {
    pub const fn new(left: T, right: T) -> Self {
        Self { left, right }
    }
}

/// Condition effect parameters (spring and damper)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub saturation: Pair<u16>,
    pub coefficient: Pair<i16>,
    #[serde(default)]
    pub center: i16,
    #[serde(default)]
    pub deadband: u16,
}

/// Effect command produced upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EffectCommand {
    /// Nothing to play
    None,

    /// Constant force; `active == false` stops the effect
    Constant {
        active: bool,
        #[serde(default)]
        level: i16,
    },

    /// Spring condition; `active == false` stops the effect
    Spring {
        active: bool,
        #[serde(default)]
        condition: Condition,
    },

    /// Damper condition; `active == false` stops the effect
    Damper {
        active: bool,
        #[serde(default)]
        condition: Condition,
    },

    /// Two-channel vibration
    Rumble { weak: u16, strong: u16 },

    /// Wheel rotation range in degrees
    Range { value: u16 },

    /// Controller LEDs, not driven by this sink
    Led,
}

/// Kind of an effect command, without its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    None,
    Constant,
    Spring,
    Damper,
    Rumble,
    Range,
    Led,
}

impl EffectCommand {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectCommand::None => EffectKind::None,
            EffectCommand::Constant { .. } => EffectKind::Constant,
            EffectCommand::Spring { .. } => EffectKind::Spring,
            EffectCommand::Damper { .. } => EffectKind::Damper,
            EffectCommand::Rumble { .. } => EffectKind::Rumble,
            EffectCommand::Range { .. } => EffectKind::Range,
            EffectCommand::Led => EffectKind::Led,
        }
    }
}

impl EffectKind {
    /// Capabilities a sink must have before this kind reaches the backend.
    ///
    /// Range, LED and empty commands are not gated.
    pub fn required_caps(self) -> HapticCaps {
        match self {
            EffectKind::Constant => HapticCaps::CONSTANT,
            EffectKind::Spring => HapticCaps::SPRING,
            EffectKind::Damper => HapticCaps::DAMPER,
            EffectKind::Rumble => HapticCaps::RUMBLE,
            EffectKind::None | EffectKind::Range | EffectKind::Led => HapticCaps::empty(),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectKind::None => "none",
            EffectKind::Constant => "constant",
            EffectKind::Spring => "spring",
            EffectKind::Damper => "damper",
            EffectKind::Rumble => "rumble",
            EffectKind::Range => "range",
            EffectKind::Led => "led",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_caps() {
        assert!(HapticCaps::SUPPORTED.contains(HapticCaps::RUMBLE));
        assert!(HapticCaps::SUPPORTED.contains(HapticCaps::DAMPER));
        assert_eq!(HapticCaps::SUPPORTED, HapticCaps::all());
    }

    #[test]
    fn test_caps_from_capability_list() {
        let caps: HapticCaps = [Capability::Rumble, Capability::Spring]
            .into_iter()
            .map(HapticCaps::from)
            .collect();
        assert_eq!(caps, HapticCaps::RUMBLE | HapticCaps::SPRING);
    }

    #[test]
    fn test_ungated_kinds() {
        assert!(EffectKind::Range.required_caps().is_empty());
        assert!(EffectKind::Led.required_caps().is_empty());
        assert!(EffectKind::None.required_caps().is_empty());
        assert_eq!(EffectKind::Damper.required_caps(), HapticCaps::DAMPER);
    }

    #[test]
    fn test_command_from_json() {
        let json = r#"{
            "type": "spring",
            "active": true,
            "condition": {
                "saturation": { "left": 100, "right": 100 },
                "coefficient": { "left": 50, "right": -50 },
                "deadband": 5
            }
        }"#;
        let command: EffectCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            EffectCommand::Spring {
                active: true,
                condition: Condition {
                    saturation: Pair::new(100, 100),
                    coefficient: Pair::new(50, -50),
                    center: 0,
                    deadband: 5,
                },
            }
        );
        assert_eq!(command.kind(), EffectKind::Spring);
    }

    #[test]
    fn test_range_command_from_json() {
        let command: EffectCommand = serde_json::from_str(r#"{ "type": "range", "value": 540 }"#).unwrap();
        assert_eq!(command, EffectCommand::Range { value: 540 });
    }
}
