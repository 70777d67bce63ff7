//! The cooperative client loop.
//!
//! One task does everything on the client side: it feeds each touch sample
//! to the [`GestureRecognizer`], offers every recognized event to the
//! [`SendPacer`], and on every tick hands the pacer's release to the
//! [`EventSink`].  It suspends only on the next tick, the next sample, or a
//! shutdown signal.
//!
//! When the sample feed ends the loop keeps ticking until the last pending
//! event is sent or dropped, then returns.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use trackpad_core::{GestureRecognizer, SemanticEvent, TouchSample, TouchSurface};

use crate::application::pacer::{PacerStats, SendPacer};

/// Where paced events go.
///
/// `send` is fire-and-forget: a sink that cannot deliver drops the event.
pub trait EventSink: Send + Sync {
    fn is_open(&self) -> bool;

    /// Events accepted by `send` but not yet written to the network.
    fn buffered_amount(&self) -> usize;

    fn send(&self, event: SemanticEvent);
}

/// Summary returned when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub samples: u64,
    pub recognized: u64,
    pub pacer: PacerStats,
}

/// Recognizer plus pacer, driven at a fixed tick.
pub struct ClientLoop {
    recognizer: GestureRecognizer,
    pacer: SendPacer,
}

impl ClientLoop {
    /// The tick period is the pacer's send interval.
    pub fn new(recognizer: GestureRecognizer, pacer: SendPacer) -> Self {
        Self { recognizer, pacer }
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    /// Feeds one sample to the recognizer and offers what it produces.
    ///
    /// Returns how many events were recognized.
    pub fn handle_sample(&mut self, surface: TouchSurface, sample: &TouchSample) -> usize {
        let events = self.recognizer.process_surface(surface, sample);
        for event in &events {
            debug!(kind = event.kind(), "recognized");
            self.pacer.offer(*event);
        }
        events.len()
    }

    /// Releases the pacer's candidate to `sink` if it may be sent now.
    pub fn handle_tick<S: EventSink + ?Sized>(&mut self, sink: &S, now: std::time::Instant) {
        let ready = sink.is_open() && sink.buffered_amount() == 0;
        if let Some(event) = self.pacer.poll(now, ready) {
            sink.send(event);
        }
    }

    /// Runs until the feed ends and drains, or `shutdown` becomes `true`.
    pub async fn run<S: EventSink + ?Sized>(
        mut self,
        mut samples: mpsc::Receiver<(TouchSurface, TouchSample)>,
        sink: &S,
        mut shutdown: watch::Receiver<bool>,
    ) -> ClientStats {
        let mut stats = ClientStats::default();
        let mut ticker = interval(self.pacer.interval().max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut feed_open = true;

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("client loop stopping on shutdown");
                        break;
                    }
                }
                sample = samples.recv(), if feed_open => match sample {
                    Some((surface, sample)) => {
                        stats.samples += 1;
                        stats.recognized += self.handle_sample(surface, &sample) as u64;
                    }
                    None => {
                        debug!("touch feed ended");
                        feed_open = false;
                    }
                },
                _ = ticker.tick() => {
                    self.handle_tick(sink, Instant::now().into_std());
                    if !feed_open && !self.pacer.has_pending() {
                        break;
                    }
                }
            }
        }

        stats.pacer = self.pacer.stats();
        info!(
            samples = stats.samples,
            recognized = stats.recognized,
            sent = stats.pacer.sent,
            superseded = stats.pacer.superseded,
            dropped = stats.pacer.dropped,
            "client loop finished"
        );
        stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
