//! Outbound send pacing.
//!
//! The touch surface can produce events far faster than the channel should
//! carry them.  [`SendPacer`] keeps only the newest unsent event and
//! releases it when both conditions hold:
//!
//! - at least `interval` has passed since the previous send, and
//! - the channel has nothing buffered.
//!
//! If the interval has passed but the channel is still busy, the pending
//! event is dropped rather than queued; the next gesture update supersedes
//! it anyway.

use std::time::{Duration, Instant};

use trackpad_core::SemanticEvent;

/// Default minimum gap between two sends.
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_millis(10);

/// Counters for one pacer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacerStats {
    pub offered: u64,
    /// Pending events overwritten by a newer one before they were sent.
    pub superseded: u64,
    /// Pending events discarded because the channel was busy.
    pub dropped: u64,
    pub sent: u64,
}

/// Most-recent-wins send pacer.
#[derive(Debug)]
pub struct SendPacer {
    interval: Duration,
    last_sent: Option<Instant>,
    pending: Option<SemanticEvent>,
    stats: PacerStats,
}

impl SendPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
            pending: None,
            stats: PacerStats::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Makes `event` the pending candidate, replacing any older one.
    pub fn offer(&mut self, event: SemanticEvent) {
        self.stats.offered += 1;
        if self.pending.replace(event).is_some() {
            self.stats.superseded += 1;
        }
    }

    /// Returns the event to send now, if any.
    ///
    /// `channel_ready` is `true` when the channel is open with an empty
    /// outbound buffer.
    pub fn poll(&mut self, now: Instant, channel_ready: bool) -> Option<SemanticEvent> {
        if self.pending.is_none() {
            return None;
        }
        if let Some(last) = self.last_sent {
            if now.saturating_duration_since(last) < self.interval {
                return None;
            }
        }

        let event = self.pending.take()?;
        if !channel_ready {
            self.stats.dropped += 1;
            return None;
        }
        self.last_sent = Some(now);
        self.stats.sent += 1;
        Some(event)
    }

    pub fn pending(&self) -> Option<&SemanticEvent> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stats(&self) -> PacerStats {
        self.stats
    }
}

impl Default for SendPacer {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_INTERVAL)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
