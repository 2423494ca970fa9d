//! Configuration loader and validator
//!
//! Loads sink configuration from TOML files in the configs/ directory.

use crate::haptic::{Capability, HapticCaps};
use crate::sink::SinkContext;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,

    /// Message template -> localized template
    #[serde(default)]
    pub translations: HashMap<String, String>,

    /// Virtual joysticks exposed by the dry-run backend
    #[serde(default)]
    pub devices: Vec<VirtualDevice>,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Trace every translated haptic record
    #[serde(default)]
    pub debug_haptic: bool,

    /// Capacity of the rumble delivery queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_haptic: false,
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize { 64 }

/// A joystick declared in the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualDevice {
    pub id: usize,

    pub name: String,

    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl VirtualDevice {
    pub fn caps(&self) -> HapticCaps {
        self.capabilities.iter().copied().map(HapticCaps::from).collect()
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        info!("Loading configuration from: {}", path_ref.display());

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml(&content)
    }

    /// Load default configuration from configs/default.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("configs/default.toml")
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;

        info!("✓ Config parsed successfully");
        debug!("  - Haptic debug: {}", config.settings.debug_haptic);
        debug!("  - Translations: {}", config.translations.len());
        debug!("  - Devices: {}", config.devices.len());

        config.validate()?;
        info!("✓ Config validation passed");

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue_capacity must be at least 1".into()
            ));
        }

        // Translations must keep the value placeholder
        for (template, translated) in &self.translations {
            if template.matches("{}").count() != translated.matches("{}").count() {
                return Err(ConfigError::Invalid(format!(
                    "translation of '{}' must keep the same '{{}}' placeholders",
                    template
                )));
            }
        }

        let mut ids = HashSet::new();
        for device in &self.devices {
            if device.name.is_empty() {
                return Err(ConfigError::Invalid(format!("device {} has an empty name", device.id)));
            }
            if !ids.insert(device.id) {
                return Err(ConfigError::Invalid(format!("duplicate device id {}", device.id)));
            }
        }

        Ok(())
    }

    /// Build the dispatcher context from these settings
    pub fn context(&self) -> SinkContext {
        let translations = Arc::new(self.translations.clone());
        SinkContext::new(self.settings.debug_haptic, move |template: &str| {
            translations
                .get(template)
                .cloned()
                .unwrap_or_else(|| template.to_string())
        })
    }
}
