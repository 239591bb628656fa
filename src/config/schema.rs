//! Configuration schema types for `lopix.toml`
//!
//! Every section and key is optional; an empty file is a valid config.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};

/// Largest accepted upscale factor.
///
/// 99 cells at 256x stays below the 65535 pixel side limit of GIF.
pub const MAX_SCALE: u32 = 256;

/// Default settings applied to all outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Nearest-neighbor upscale factor
    #[serde(default = "default_scale")]
    pub scale: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { scale: default_scale() }
    }
}

fn default_scale() -> u32 {
    1
}

/// GIF output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifConfig {
    /// Loop forever instead of playing once
    #[serde(default = "default_true")]
    pub repeat: bool,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self { repeat: true }
    }
}

fn default_true() -> bool {
    true
}

/// Diagnostic logging settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when `--log-level` is absent
    #[serde(default)]
    pub level: LogLevel,
}

/// Complete lopix.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LopixConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub gif: GifConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "defaults.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lopix.toml: '{}' {}", self.field, self.message)
    }
}

impl LopixConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.defaults.scale == 0 || self.defaults.scale > MAX_SCALE {
            errors.push(ConfigValidationError {
                field: "defaults.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_SCALE),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
