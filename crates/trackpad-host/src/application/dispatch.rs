//! Dispatcher: routes one semantic event per tick to the input injector.
//!
//! Pointer moves are not injected directly.  They feed the
//! [`MovementSmoother`], which the dispatcher polls on every tick whether or
//! not an event arrived, so accumulated motion keeps flowing while the queue
//! is empty.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, trace};
use trackpad_core::{SemanticEvent, VerticalDirection};

use crate::application::inject::{
    InjectionError, InputInjector, ScrollAxis, MINIMIZE_ALL_CHORD, NEXT_WINDOW_CHORD,
    RESTORE_ALL_CHORD, ZOOM_IN_CHORD, ZOOM_OUT_CHORD,
};
use crate::application::smoother::MovementSmoother;
use crate::domain::DispatchConfig;

/// Per-connection dispatcher.
pub struct Dispatcher {
    injector: Arc<dyn InputInjector>,
    smoother: MovementSmoother,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(injector: Arc<dyn InputInjector>, config: DispatchConfig, now: Instant) -> Self {
        let smoother = MovementSmoother::new(
            config.smoothing_interval(),
            config.jitter_threshold,
            config.smoothing_window,
            now,
        );
        Self {
            injector,
            smoother,
            config,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn smoother(&self) -> &MovementSmoother {
        &self.smoother
    }

    /// Applies new dispatch settings from the next tick on.
    pub fn update_config(&mut self, config: DispatchConfig) {
        self.smoother.reconfigure(
            config.smoothing_interval(),
            config.jitter_threshold,
            config.smoothing_window,
        );
        self.config = config;
    }

    /// Runs one dispatch tick.
    ///
    /// Routes `event` if there is one, then flushes the smoother.  Injector
    /// failures are logged and never stop the tick.
    pub fn tick(&mut self, event: Option<SemanticEvent>, now: Instant) {
        if let Some(event) = event {
            trace!(kind = event.kind(), "dispatching");
            if let Err(e) = self.route(event) {
                error!(kind = event.kind(), "input injection failed: {e}");
            }
        }

        let delta = self.smoother.try_smooth(now);
        let (whole_dx, whole_dy) = (delta.dx.round(), delta.dy.round());
        self.smoother.carry(delta.dx - whole_dx, delta.dy - whole_dy);
        let (dx, dy) = (whole_dx as i32, whole_dy as i32);
        if dx != 0 || dy != 0 {
            if let Err(e) = self.injector.move_pointer_by(dx, dy) {
                error!(dx, dy, "pointer move failed: {e}");
            }
        }
    }

    fn route(&mut self, event: SemanticEvent) -> Result<(), InjectionError> {
        match event {
            SemanticEvent::Move { dx, dy } => {
                self.smoother.add_movement(dx, dy);
                Ok(())
            }
            SemanticEvent::Scroll { dx, dy } => {
                let axes = [
                    (ScrollAxis::Vertical, self.wheel_amount(dy)),
                    (ScrollAxis::Horizontal, self.wheel_amount(dx)),
                ];
                // Each axis is attempted even if the other fails.
                let mut first_error = None;
                for (axis, amount) in axes {
                    if amount == 0 {
                        continue;
                    }
                    if let Err(e) = self.injector.scroll_wheel(axis, amount) {
                        first_error.get_or_insert(e);
                    }
                }
                first_error.map_or(Ok(()), Err)
            }
            SemanticEvent::Zoom { factor } => {
                let chord = if factor > 1.0 {
                    ZOOM_IN_CHORD
                } else {
                    ZOOM_OUT_CHORD
                };
                self.injector.send_hotkey(chord)
            }
            SemanticEvent::Click { button } => self.injector.click_button(button),
            SemanticEvent::NextWindow => self.injector.send_hotkey(NEXT_WINDOW_CHORD),
            SemanticEvent::VerticalGesture { direction } => {
                let chord = match direction {
                    VerticalDirection::Down => MINIMIZE_ALL_CHORD,
                    VerticalDirection::Up => RESTORE_ALL_CHORD,
                };
                debug!(?direction, "vertical gesture");
                self.injector.send_hotkey(chord)
            }
        }
    }

    /// Client scroll units to wheel units, truncated toward zero.
    fn wheel_amount(&self, value: f64) -> i32 {
        (value * self.config.wheel_scale).trunc() as i32
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
