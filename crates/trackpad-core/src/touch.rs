//! Raw touch data produced by a touch surface.
//!
//! A [`TouchSample`] is a snapshot of every finger currently down on one
//! surface.  Surfaces report samples at their native rate (typically 60–120
//! Hz); the recognizer diffs consecutive samples to derive motion.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier of one finger, stable for as long as that finger stays down.
pub type TouchId = u64;

/// One finger on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: TouchId,
    /// Horizontal position in surface pixels.
    pub x: f64,
    /// Vertical position in surface pixels (grows downwards).
    pub y: f64,
}

impl TouchPoint {
    pub fn new(id: TouchId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

/// Which control on the touch device produced a sample.
///
/// The rails are narrow single-purpose strips next to the main trackpad area
/// and are recognized independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TouchSurface {
    #[default]
    Trackpad,
    ScrollRail,
    ZoomRail,
}

/// Snapshot of all fingers currently down on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchSample {
    /// Time of the snapshot, measured from an arbitrary but fixed epoch.
    pub timestamp: Duration,
    /// Every finger currently down.  An empty list means all fingers lifted.
    pub touches: Vec<TouchPoint>,
}

impl TouchSample {
    pub fn new(timestamp: Duration, touches: Vec<TouchPoint>) -> Self {
        Self { timestamp, touches }
    }

    /// A sample with no fingers down, marking the end of a contact episode.
    pub fn lifted(timestamp: Duration) -> Self {
        Self {
            timestamp,
            touches: Vec::new(),
        }
    }

    /// Convenience constructor taking the timestamp in milliseconds.
    pub fn at_millis(millis: u64, touches: Vec<TouchPoint>) -> Self {
        Self::new(Duration::from_millis(millis), touches)
    }

    pub fn finger_count(&self) -> usize {
        self.touches.len()
    }

    /// Average position of all fingers, or `None` when no finger is down.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.touches.is_empty() {
            return None;
        }
        let n = self.touches.len() as f64;
        let (sx, sy) = self
            .touches
            .iter()
            .fold((0.0, 0.0), |(sx, sy), t| (sx + t.x, sy + t.y));
        Some((sx / n, sy / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_of_empty_sample_is_none() {
        assert_eq!(TouchSample::lifted(Duration::ZERO).centroid(), None);
    }

    #[test]
    fn test_centroid_averages_all_points() {
        // Arrange
        let sample = TouchSample::at_millis(
            0,
            vec![
                TouchPoint::new(1, 0.0, 0.0),
                TouchPoint::new(2, 30.0, 60.0),
                TouchPoint::new(3, 60.0, 0.0),
            ],
        );

        // Act
        let (x, y) = sample.centroid().unwrap();

        // Assert
        assert_eq!(x, 30.0);
        assert_eq!(y, 20.0);
    }

    #[test]
    fn test_surface_serializes_camel_case() {
        let json = serde_json::to_string(&TouchSurface::ScrollRail).unwrap();
        assert_eq!(json, r#""scrollRail""#);
    }

    #[test]
    fn test_surface_defaults_to_trackpad() {
        assert_eq!(TouchSurface::default(), TouchSurface::Trackpad);
    }
}
