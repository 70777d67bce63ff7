//! Tunable parameters of the gesture recognizer.
//!
//! A [`GestureConfig`] is injected into the recognizer at construction and can
//! be replaced later with [`GestureRecognizer::update_config`].  Replacing it
//! only affects samples processed afterwards; events already emitted are not
//! recomputed.
//!
//! The struct derives `Deserialize` with a per-field default so a partial
//! `[gesture]` table in the host's TOML file fills the rest from the defaults.
//!
//! [`GestureRecognizer::update_config`]: crate::gesture::GestureRecognizer::update_config

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::event::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

/// Error returned when a [`GestureConfig`] field is out of range.
#[derive(Debug, Error, PartialEq)]
pub enum GestureConfigError {
    #[error("{field} must be a finite number greater than zero, got {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Sensitivities and thresholds used by the recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Multiplier applied to single-finger drag deltas.
    #[serde(default = "default_move_sensitivity")]
    pub move_sensitivity: f64,

    /// Multiplier applied to two-finger centroid deltas.
    #[serde(default = "default_scroll_sensitivity")]
    pub scroll_sensitivity: f64,

    /// Multiplier applied to scroll rail drags.
    #[serde(default = "default_rail_scroll_sensitivity")]
    pub rail_scroll_sensitivity: f64,

    /// A contact shorter than this (and without movement) is a tap.
    #[serde(default = "default_tap_threshold_ms")]
    pub tap_threshold_ms: u64,

    /// Horizontal three-finger displacement, in pixels, that switches window.
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,

    /// Vertical three-finger displacement, in pixels, for a vertical gesture.
    #[serde(default = "default_vertical_threshold")]
    pub vertical_threshold: f64,

    /// Zoom rail displacement, in pixels, that fires one zoom step.
    #[serde(default = "default_zoom_threshold")]
    pub zoom_threshold: f64,

    /// Minimum time between two zoom steps.
    #[serde(default = "default_zoom_cooldown_ms")]
    pub zoom_cooldown_ms: u64,

    #[serde(default = "default_zoom_in_factor")]
    pub zoom_in_factor: f64,

    #[serde(default = "default_zoom_out_factor")]
    pub zoom_out_factor: f64,
}

fn default_move_sensitivity() -> f64 {
    3.5
}
fn default_scroll_sensitivity() -> f64 {
    0.1
}
fn default_rail_scroll_sensitivity() -> f64 {
    1.0
}
fn default_tap_threshold_ms() -> u64 {
    150
}
fn default_swipe_threshold() -> f64 {
    50.0
}
fn default_vertical_threshold() -> f64 {
    50.0
}
fn default_zoom_threshold() -> f64 {
    100.0
}
fn default_zoom_cooldown_ms() -> u64 {
    300
}
fn default_zoom_in_factor() -> f64 {
    ZOOM_IN_FACTOR
}
fn default_zoom_out_factor() -> f64 {
    ZOOM_OUT_FACTOR
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            move_sensitivity: default_move_sensitivity(),
            scroll_sensitivity: default_scroll_sensitivity(),
            rail_scroll_sensitivity: default_rail_scroll_sensitivity(),
            tap_threshold_ms: default_tap_threshold_ms(),
            swipe_threshold: default_swipe_threshold(),
            vertical_threshold: default_vertical_threshold(),
            zoom_threshold: default_zoom_threshold(),
            zoom_cooldown_ms: default_zoom_cooldown_ms(),
            zoom_in_factor: default_zoom_in_factor(),
            zoom_out_factor: default_zoom_out_factor(),
        }
    }
}

impl GestureConfig {
    pub fn tap_threshold(&self) -> Duration {
        Duration::from_millis(self.tap_threshold_ms)
    }

    pub fn zoom_cooldown(&self) -> Duration {
        Duration::from_millis(self.zoom_cooldown_ms)
    }

    /// Checks that every sensitivity, threshold and factor is usable.
    ///
    /// Durations are unsigned so only the zero tap threshold is rejected; a
    /// zero zoom cooldown is allowed and disables rate limiting.
    ///
    /// # Errors
    ///
    /// Returns [`GestureConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), GestureConfigError> {
        let positive = [
            ("move_sensitivity", self.move_sensitivity),
            ("scroll_sensitivity", self.scroll_sensitivity),
            ("rail_scroll_sensitivity", self.rail_scroll_sensitivity),
            ("tap_threshold_ms", self.tap_threshold_ms as f64),
            ("swipe_threshold", self.swipe_threshold),
            ("vertical_threshold", self.vertical_threshold),
            ("zoom_threshold", self.zoom_threshold),
            ("zoom_in_factor", self.zoom_in_factor),
            ("zoom_out_factor", self.zoom_out_factor),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GestureConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = GestureConfig::default();
        assert_eq!(config.move_sensitivity, 3.5);
        assert_eq!(config.scroll_sensitivity, 0.1);
        assert_eq!(config.rail_scroll_sensitivity, 1.0);
        assert_eq!(config.tap_threshold(), Duration::from_millis(150));
        assert_eq!(config.swipe_threshold, 50.0);
        assert_eq!(config.vertical_threshold, 50.0);
        assert_eq!(config.zoom_threshold, 100.0);
        assert_eq!(config.zoom_cooldown(), Duration::from_millis(300));
        assert_eq!(config.zoom_in_factor, 1.1);
        assert_eq!(config.zoom_out_factor, 0.9);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GestureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_sensitivity() {
        // Arrange
        let config = GestureConfig {
            move_sensitivity: 0.0,
            ..GestureConfig::default()
        };

        // Act
        let result = config.validate();

        // Assert
        assert_eq!(
            result,
            Err(GestureConfigError::InvalidValue {
                field: "move_sensitivity",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        let config = GestureConfig {
            zoom_threshold: f64::INFINITY,
            ..GestureConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GestureConfigError::InvalidValue {
                field: "zoom_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_tap_threshold() {
        let config = GestureConfig {
            tap_threshold_ms: 0,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_zero_zoom_cooldown() {
        let config = GestureConfig {
            zoom_cooldown_ms: 0,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_missing_fields_with_defaults() {
        // Arrange: only one field present
        let json = r#"{"move_sensitivity": 2.0}"#;

        // Act
        let config: GestureConfig = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(config.move_sensitivity, 2.0);
        assert_eq!(config.scroll_sensitivity, 0.1);
        assert_eq!(config.zoom_cooldown_ms, 300);
    }
}
