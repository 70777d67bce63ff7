//! Per-contact state of the main trackpad surface.

use std::collections::HashMap;
use std::time::Duration;

use crate::touch::{TouchId, TouchPoint, TouchSample};

/// State of one continuous contact episode, from the first finger down to
/// the last finger up.
///
/// Anchors are only meaningful for the finger count they were captured at,
/// so every change in the number of fingers resets them.
#[derive(Debug, Clone)]
pub(crate) struct GestureSession {
    pub started_at: Duration,
    /// Last known position of every finger, keyed by identifier.
    pub touches: HashMap<TouchId, TouchPoint>,
    pub finger_count: usize,
    /// Cleared by any emitted move and by any multi-finger contact.
    pub tap_eligible: bool,
    /// Centroid of the previous two-finger sample.
    pub two_finger_centroid: Option<(f64, f64)>,
    /// Centroid captured on entering (or re-anchoring) the three-finger state.
    pub three_finger_anchor: Option<(f64, f64)>,
}

impl GestureSession {
    /// Opens a session on the first sample of a contact.
    pub fn begin(sample: &TouchSample) -> Self {
        let mut session = Self {
            started_at: sample.timestamp,
            touches: HashMap::new(),
            finger_count: 0,
            tap_eligible: true,
            two_finger_centroid: None,
            three_finger_anchor: None,
        };
        session.change_finger_count(sample);
        session
    }

    /// Resets every anchor for the sample's finger count and records the
    /// sample as the new baseline.
    pub fn change_finger_count(&mut self, sample: &TouchSample) {
        let count = sample.finger_count();
        self.finger_count = count;
        self.touches.clear();
        self.two_finger_centroid = None;
        self.three_finger_anchor = None;

        if count > 1 {
            self.tap_eligible = false;
        }
        match count {
            2 => self.two_finger_centroid = sample.centroid(),
            3 => self.three_finger_anchor = sample.centroid(),
            _ => {}
        }
        self.remember(sample);
    }

    /// Replaces the stored positions with the sample's, dropping fingers
    /// that are no longer down.
    pub fn remember(&mut self, sample: &TouchSample) {
        self.touches
            .retain(|id, _| sample.touches.iter().any(|point| point.id == *id));
        for point in &sample.touches {
            self.touches.insert(point.id, *point);
        }
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }
}
