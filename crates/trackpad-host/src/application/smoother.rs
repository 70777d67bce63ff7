//! MovementSmoother: turns bursts of small pointer deltas into one move per
//! pacing interval.
//!
//! Touch clients send many sub-pixel moves.  Injecting each one separately
//! loses the fractional parts and makes the pointer stutter, so the
//! dispatcher accumulates them here and flushes the sum at a bounded rate.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Pointer delta released by [`MovementSmoother::try_smooth`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothedDelta {
    pub dx: f64,
    pub dy: f64,
}

impl SmoothedDelta {
    pub const ZERO: SmoothedDelta = SmoothedDelta { dx: 0.0, dy: 0.0 };

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Per-connection movement accumulator.
#[derive(Debug)]
pub struct MovementSmoother {
    interval: Duration,
    jitter_threshold: f64,
    window: usize,
    sum_dx: f64,
    sum_dy: f64,
    last_emit: Instant,
    /// Most recent raw deltas, oldest first.
    recent: VecDeque<(f64, f64)>,
}

impl MovementSmoother {
    /// `now` starts the first pacing interval.
    pub fn new(interval: Duration, jitter_threshold: f64, window: usize, now: Instant) -> Self {
        let window = window.max(1);
        Self {
            interval,
            jitter_threshold,
            window,
            sum_dx: 0.0,
            sum_dy: 0.0,
            last_emit: now,
            recent: VecDeque::with_capacity(window),
        }
    }

    /// Adds a raw movement to the running sums.
    pub fn add_movement(&mut self, dx: f64, dy: f64) {
        self.sum_dx += dx;
        self.sum_dy += dy;
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back((dx, dy));
    }

    /// Releases the accumulated movement if the pacing interval has elapsed.
    ///
    /// Before the interval: returns zero and keeps the sums.  After it:
    /// returns the sums with any axis below the jitter threshold zeroed,
    /// resets both sums, and restarts the interval from `now`.
    pub fn try_smooth(&mut self, now: Instant) -> SmoothedDelta {
        if now.saturating_duration_since(self.last_emit) < self.interval {
            return SmoothedDelta::ZERO;
        }

        let delta = SmoothedDelta {
            dx: self.suppress_jitter(self.sum_dx),
            dy: self.suppress_jitter(self.sum_dy),
        };
        self.sum_dx = 0.0;
        self.sum_dy = 0.0;
        self.last_emit = now;
        delta
    }

    /// Returns the part of a released delta that could not be injected.
    ///
    /// The dispatcher injects whole pixels; the rounding remainder goes back
    /// into the sums so it is released with the next flush.
    pub fn carry(&mut self, dx: f64, dy: f64) {
        self.sum_dx += dx;
        self.sum_dy += dy;
    }

    /// Unreleased movement, before jitter suppression.
    pub fn pending(&self) -> (f64, f64) {
        (self.sum_dx, self.sum_dy)
    }

    pub fn recent(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.recent.iter()
    }

    pub fn recent_len(&self) -> usize {
        self.recent.len()
    }

    /// Applies new pacing parameters.  Pending movement is kept.
    pub fn reconfigure(&mut self, interval: Duration, jitter_threshold: f64, window: usize) {
        self.interval = interval;
        self.jitter_threshold = jitter_threshold;
        self.window = window.max(1);
        while self.recent.len() > self.window {
            self.recent.pop_front();
        }
    }

    fn suppress_jitter(&self, value: f64) -> f64 {
        if value.abs() < self.jitter_threshold {
            0.0
        } else {
            value
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
