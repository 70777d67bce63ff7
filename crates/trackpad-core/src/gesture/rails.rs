//! Recognizers for the two single-purpose rails beside the trackpad.
//!
//! Each rail keeps its own state and never looks at the trackpad session, so
//! a finger on a rail and fingers on the trackpad are recognized
//! independently.

use std::time::Duration;

use crate::gesture::config::GestureConfig;
use crate::protocol::event::SemanticEvent;
use crate::touch::{TouchId, TouchSample};

/// Vertical scroll strip: every sample with a previous position for the same
/// finger scrolls by the vertical delta.
#[derive(Debug, Default, Clone)]
pub struct ScrollRail {
    last: Option<(TouchId, f64)>,
}

impl ScrollRail {
    pub fn process(&mut self, sample: &TouchSample, config: &GestureConfig) -> Option<SemanticEvent> {
        let Some(touch) = sample.touches.first() else {
            self.last = None;
            return None;
        };

        let previous = self.last.replace((touch.id, touch.y));
        match previous {
            Some((id, prev_y)) if id == touch.id => {
                let dy = (touch.y - prev_y) * config.rail_scroll_sensitivity;
                (dy != 0.0).then_some(SemanticEvent::Scroll { dx: 0.0, dy })
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Horizontal zoom strip: dragging further than the zoom threshold from the
/// anchor fires one zoom step, rate-limited by the zoom cooldown.
#[derive(Debug, Default, Clone)]
pub struct ZoomRail {
    anchor_x: Option<f64>,
    /// Timestamp of the last zoom step.  Kept across lifts.
    last_zoom: Option<Duration>,
}

impl ZoomRail {
    pub fn process(&mut self, sample: &TouchSample, config: &GestureConfig) -> Option<SemanticEvent> {
        let Some(touch) = sample.touches.first() else {
            self.anchor_x = None;
            return None;
        };

        let Some(anchor) = self.anchor_x else {
            self.anchor_x = Some(touch.x);
            return None;
        };

        let delta = touch.x - anchor;
        if delta.abs() <= config.zoom_threshold || !self.cooled_down(sample.timestamp, config) {
            return None;
        }

        self.anchor_x = Some(touch.x);
        self.last_zoom = Some(sample.timestamp);
        let factor = if delta > 0.0 {
            config.zoom_in_factor
        } else {
            config.zoom_out_factor
        };
        Some(SemanticEvent::Zoom { factor })
    }

    fn cooled_down(&self, now: Duration, config: &GestureConfig) -> bool {
        match self.last_zoom {
            None => true,
            Some(last) => now.saturating_sub(last) >= config.zoom_cooldown(),
        }
    }

    /// Drops the anchor but keeps the cooldown clock running.
    pub fn reset(&mut self) {
        self.anchor_x = None;
    }
}
