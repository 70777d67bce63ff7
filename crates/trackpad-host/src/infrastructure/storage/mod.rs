//! Storage infrastructure: the settings file.
//!
//! The `config` sub-module reads `[gesture]` and `[dispatch]` tables from a
//! TOML file, falls back to defaults when the file does not exist, and can
//! write the defaults out as a starting point for editing.

pub mod config;

pub use config::{load_settings, parse_settings, save_settings, ConfigError};
