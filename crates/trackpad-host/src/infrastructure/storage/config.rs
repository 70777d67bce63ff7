//! TOML settings file for the host.
//!
//! The file has two optional tables; every field inside them is optional
//! too, so a file that sets a single value is valid:
//!
//! ```toml
//! [gesture]
//! move_sensitivity = 4.0
//! zoom_threshold = 80.0
//!
//! [dispatch]
//! tick_ms = 16
//! queue_capacity = 10
//! ```
//!
//! Settings are validated after parsing.  A file that parses but holds an
//! unusable value (a zero tick, a negative sensitivity) is rejected as a
//! whole rather than partially applied.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{HostSettings, SettingsError};

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file parsed but holds an out-of-range value.
    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsError),
}

/// Parses and validates settings from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML and
/// [`ConfigError::Invalid`] for values that fail validation.
pub fn parse_settings(content: &str) -> Result<HostSettings, ConfigError> {
    let settings: HostSettings = toml::from_str(content)?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from `path`.
///
/// Returns `HostSettings::default()` when no path is given or the file does
/// not exist yet.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and the errors of [`parse_settings`] for the file's content.
pub fn load_settings(path: Option<&Path>) -> Result<HostSettings, ConfigError> {
    let Some(path) = path else {
        return Ok(HostSettings::default());
    };

    match std::fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostSettings::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `settings` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_settings(path: &Path, settings: &HostSettings) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
