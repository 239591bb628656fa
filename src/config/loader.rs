//! Configuration loading and discovery for `lopix.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{ConfigValidationError, LopixConfig};
use crate::logging::LogLevel;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "lopix.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse lopix.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<ConfigValidationError>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override scale factor
    pub scale: Option<u32>,
    /// Override GIF looping
    pub repeat: Option<bool>,
    /// Override log level
    pub log_level: Option<LogLevel>,
}

/// Find lopix.toml by walking up from a specific directory.
///
/// # Returns
/// - `Some(path)` for the nearest lopix.toml at or above `start`
/// - `None` if no config file is found
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        // Reached root, no config found
        if !current.pop() {
            return None;
        }
    }
}

/// Directory to start discovery from for a given input path.
///
/// Standard input (`-`) and bare file names start from the working
/// directory.
pub fn discovery_start(input: &Path) -> PathBuf {
    let dir = match input.parent() {
        Some(parent) if input != Path::new("-") && !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise returns the
/// default configuration.
///
/// # Example
/// ```ignore
/// let path = find_config_from(discovery_start(Path::new("art/ship.lopix")));
/// let config = load_config(path.as_deref())?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<LopixConfig, ConfigError> {
    match path {
        Some(p) => load_config_file(p),
        None => Ok(LopixConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<LopixConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: LopixConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut LopixConfig, overrides: &CliOverrides) {
    if let Some(scale) = overrides.scale {
        config.defaults.scale = scale;
    }

    if let Some(repeat) = overrides.repeat {
        config.gif.repeat = repeat;
    }

    if let Some(level) = overrides.log_level {
        config.logging.level = level;
    }
}
