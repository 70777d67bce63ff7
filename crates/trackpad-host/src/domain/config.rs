//! Host configuration types.
//!
//! [`HostSettings`] is what the TOML settings file holds and what the
//! settings store publishes to live connections.  [`ServerConfig`] only
//! comes from the command line and is fixed for the process lifetime.
//!
//! ```toml
//! [gesture]
//! move_sensitivity = 3.5
//! scroll_sensitivity = 0.1
//!
//! [dispatch]
//! tick_ms = 16
//! queue_capacity = 10
//! jitter_threshold = 0.5
//! wheel_scale = -60.0
//! ```
//!
//! Every field has a serde default so a partial file, or no file at all,
//! yields a usable configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trackpad_core::{GestureConfig, GestureConfigError};

/// Default TCP port for the page and the WebSocket endpoint.
pub const DEFAULT_PORT: u16 = 5000;

/// Error returned when a [`DispatchConfig`] field is out of range.
#[derive(Debug, Error, PartialEq)]
pub enum DispatchConfigError {
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },

    #[error("{field} has unusable value {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Either half of [`HostSettings`] failed validation.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("invalid [gesture] settings: {0}")]
    Gesture(#[from] GestureConfigError),

    #[error("invalid [dispatch] settings: {0}")]
    Dispatch(#[from] DispatchConfigError),
}

/// Pacing and scaling of the per-connection dispatch loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Dispatch tick period.  One queued event is handled per tick.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Ingest queue capacity; the oldest event is evicted on overflow.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Minimum time between two smoothed pointer moves.
    #[serde(default = "default_smoothing_interval_ms")]
    pub smoothing_interval_ms: u64,

    /// Accumulated movement below this magnitude, per axis, is discarded.
    #[serde(default = "default_jitter_threshold")]
    pub jitter_threshold: f64,

    /// Factor from client scroll units to wheel units.  Negative so that a
    /// positive client scroll moves content the way the fingers moved.
    #[serde(default = "default_wheel_scale")]
    pub wheel_scale: f64,

    /// Number of raw movement samples kept for diagnostics.
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
}

fn default_tick_ms() -> u64 {
    16
}
fn default_queue_capacity() -> usize {
    10
}
fn default_smoothing_interval_ms() -> u64 {
    16
}
fn default_jitter_threshold() -> f64 {
    0.5
}
fn default_wheel_scale() -> f64 {
    -60.0
}
fn default_smoothing_window() -> usize {
    8
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            queue_capacity: default_queue_capacity(),
            smoothing_interval_ms: default_smoothing_interval_ms(),
            jitter_threshold: default_jitter_threshold(),
            wheel_scale: default_wheel_scale(),
            smoothing_window: default_smoothing_window(),
        }
    }
}

impl DispatchConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn smoothing_interval(&self) -> Duration {
        Duration::from_millis(self.smoothing_interval_ms)
    }

    /// # Errors
    ///
    /// Returns [`DispatchConfigError`] naming the first unusable field.
    pub fn validate(&self) -> Result<(), DispatchConfigError> {
        if self.tick_ms == 0 {
            return Err(DispatchConfigError::Zero { field: "tick_ms" });
        }
        if self.queue_capacity == 0 {
            return Err(DispatchConfigError::Zero {
                field: "queue_capacity",
            });
        }
        if self.smoothing_window == 0 {
            return Err(DispatchConfigError::Zero {
                field: "smoothing_window",
            });
        }
        if !self.jitter_threshold.is_finite() || self.jitter_threshold < 0.0 {
            return Err(DispatchConfigError::OutOfRange {
                field: "jitter_threshold",
                value: self.jitter_threshold,
            });
        }
        if !self.wheel_scale.is_finite() || self.wheel_scale == 0.0 {
            return Err(DispatchConfigError::OutOfRange {
                field: "wheel_scale",
                value: self.wheel_scale,
            });
        }
        Ok(())
    }
}

/// Everything the settings file controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSettings {
    /// Sensitivities and thresholds rendered into the touch page.
    #[serde(default)]
    pub gesture: GestureConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl HostSettings {
    /// # Errors
    ///
    /// Returns [`SettingsError`] if either section fails validation.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.gesture.validate()?;
        self.dispatch.validate()?;
        Ok(())
    }
}

/// Listener settings taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the page and WebSocket listener binds to.
    ///
    /// `0.0.0.0` is needed for a phone on the LAN to reach the host.
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
