//! GestureRecognizer: turns touch samples into semantic events.
//!
//! The recognizer is a pure state machine.  It owns no clock and performs no
//! I/O: every decision is derived from the samples' own timestamps, which
//! makes it deterministic under test and cheap enough to run per frame.
//!
//! # Main surface
//!
//! | fingers | behaviour                                                     |
//! |---------|---------------------------------------------------------------|
//! | 1       | drag → `Move`; short contact without movement → `Click`       |
//! | 2       | centroid delta → `Scroll` (vertical axis inverted)            |
//! | 3       | centroid past threshold → `NextWindow` or `VerticalGesture`   |
//! | 0, >3   | nothing                                                       |

use tracing::{debug, trace};

use crate::gesture::config::{GestureConfig, GestureConfigError};
use crate::gesture::rails::{ScrollRail, ZoomRail};
use crate::gesture::session::GestureSession;
use crate::protocol::event::{MouseButton, SemanticEvent, VerticalDirection};
use crate::touch::{TouchSample, TouchSurface};

/// Stateful gesture recognizer for one touch device.
///
/// Holds at most one active session for the trackpad and independent state
/// for each rail.
#[derive(Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    session: Option<GestureSession>,
    scroll_rail: ScrollRail,
    zoom_rail: ZoomRail,
}

impl GestureRecognizer {
    /// Creates a recognizer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GestureConfigError`] if the configuration fails validation.
    pub fn new(config: GestureConfig) -> Result<Self, GestureConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            session: None,
            scroll_rail: ScrollRail::default(),
            zoom_rail: ZoomRail::default(),
        })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replaces the configuration for all subsequently processed samples.
    ///
    /// On error the previous configuration stays in effect.
    pub fn update_config(&mut self, config: GestureConfig) -> Result<(), GestureConfigError> {
        config.validate()?;
        debug!(?config, "gesture configuration updated");
        self.config = config;
        Ok(())
    }

    /// Changes only the drag and two-finger scroll sensitivities.
    pub fn set_sensitivity(
        &mut self,
        move_sensitivity: f64,
        scroll_sensitivity: f64,
    ) -> Result<(), GestureConfigError> {
        self.update_config(GestureConfig {
            move_sensitivity,
            scroll_sensitivity,
            ..self.config.clone()
        })
    }

    /// Returns `true` while fingers are down on the trackpad.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Processes one trackpad sample.
    pub fn process(&mut self, sample: &TouchSample) -> Vec<SemanticEvent> {
        self.process_surface(TouchSurface::Trackpad, sample)
    }

    /// Processes one sample from the given surface.
    pub fn process_surface(
        &mut self,
        surface: TouchSurface,
        sample: &TouchSample,
    ) -> Vec<SemanticEvent> {
        let events: Vec<SemanticEvent> = match surface {
            TouchSurface::Trackpad => self.process_trackpad(sample).into_iter().collect(),
            TouchSurface::ScrollRail => self
                .scroll_rail
                .process(sample, &self.config)
                .into_iter()
                .collect(),
            TouchSurface::ZoomRail => self
                .zoom_rail
                .process(sample, &self.config)
                .into_iter()
                .collect(),
        };
        for event in &events {
            trace!(?surface, kind = event.kind(), "gesture recognized");
        }
        events
    }

    /// Forgets every session and anchor.  The zoom cooldown is kept.
    pub fn reset(&mut self) {
        self.session = None;
        self.scroll_rail.reset();
        self.zoom_rail.reset();
    }

    fn process_trackpad(&mut self, sample: &TouchSample) -> Option<SemanticEvent> {
        if sample.touches.is_empty() {
            return self.end_session(sample);
        }

        if self.session.is_none() {
            self.session = Some(GestureSession::begin(sample));
            return None;
        }
        let session = self.session.as_mut()?;

        if session.finger_count != sample.finger_count() {
            session.change_finger_count(sample);
            return None;
        }

        let config = &self.config;
        let event = match sample.finger_count() {
            1 => Self::single_finger(session, sample, config),
            2 => Self::two_finger(session, sample, config),
            3 => Self::three_finger(session, sample, config),
            _ => None,
        };
        session.remember(sample);
        event
    }

    fn end_session(&mut self, sample: &TouchSample) -> Option<SemanticEvent> {
        let session = self.session.take()?;
        let elapsed = session.elapsed(sample.timestamp);
        if session.tap_eligible && elapsed < self.config.tap_threshold() {
            debug!(elapsed_ms = elapsed.as_millis() as u64, "tap");
            return Some(SemanticEvent::Click {
                button: MouseButton::Left,
            });
        }
        None
    }

    fn single_finger(
        session: &mut GestureSession,
        sample: &TouchSample,
        config: &GestureConfig,
    ) -> Option<SemanticEvent> {
        let current = sample.touches[0];
        let previous = session.touches.get(&current.id)?;

        let dx = (current.x - previous.x) * config.move_sensitivity;
        let dy = (current.y - previous.y) * config.move_sensitivity;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        session.tap_eligible = false;
        Some(SemanticEvent::Move { dx, dy })
    }

    fn two_finger(
        session: &mut GestureSession,
        sample: &TouchSample,
        config: &GestureConfig,
    ) -> Option<SemanticEvent> {
        let current = sample.centroid()?;
        let previous = session.two_finger_centroid.replace(current)?;

        let dx = (current.0 - previous.0) * config.scroll_sensitivity;
        let dy = -(current.1 - previous.1) * config.scroll_sensitivity;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(SemanticEvent::Scroll { dx, dy })
    }

    fn three_finger(
        session: &mut GestureSession,
        sample: &TouchSample,
        config: &GestureConfig,
    ) -> Option<SemanticEvent> {
        let current = sample.centroid()?;
        let Some(anchor) = session.three_finger_anchor else {
            session.three_finger_anchor = Some(current);
            return None;
        };

        let dx = current.0 - anchor.0;
        let dy = current.1 - anchor.1;
        let (adx, ady) = (dx.abs(), dy.abs());

        let event = if adx >= ady && adx > config.swipe_threshold {
            SemanticEvent::NextWindow
        } else if ady > config.vertical_threshold {
            let direction = if dy > 0.0 {
                VerticalDirection::Down
            } else {
                VerticalDirection::Up
            };
            SemanticEvent::VerticalGesture { direction }
        } else {
            return None;
        };

        session.three_finger_anchor = Some(current);
        Some(event)
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self {
            config: GestureConfig::default(),
            session: None,
            scroll_rail: ScrollRail::default(),
            zoom_rail: ZoomRail::default(),
        }
    }
}
