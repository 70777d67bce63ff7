//! Domain layer for trackpad-host.
//!
//! Plain settings types with no I/O.  The infrastructure layer fills them from
//! the CLI and the TOML settings file.

pub mod config;

pub use config::{
    DispatchConfig, DispatchConfigError, HostSettings, ServerConfig, SettingsError, DEFAULT_PORT,
};
