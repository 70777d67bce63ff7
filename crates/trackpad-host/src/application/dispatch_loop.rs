//! The per-connection dispatch task.
//!
//! Drains at most one event from the [`IngestQueue`] per tick and hands it to
//! the [`Dispatcher`].  The task's lifetime is a child of its connection: the
//! connection signals shutdown through a `watch` channel and then awaits the
//! task's `JoinHandle`, so no injector call is ever abandoned halfway.
//!
//! Shutdown is only observed between ticks; a tick in progress always runs
//! to completion.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dispatch::Dispatcher;
use crate::application::ingest_queue::IngestQueue;
use crate::domain::HostSettings;

/// Handle owned by the connection that spawned the loop.
pub struct DispatchHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Dispatcher>,
}

impl DispatchHandle {
    /// Signals the loop to stop after its current tick and waits for it.
    ///
    /// Returns the dispatcher so callers can inspect its final state.
    pub async fn stop(self) -> Option<Dispatcher> {
        // The loop may already be gone if it panicked; nothing to signal then.
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(dispatcher) => Some(dispatcher),
            Err(e) => {
                warn!("dispatch task ended abnormally: {e}");
                None
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns the dispatch loop for one connection.
///
/// `settings` delivers live changes: the tick period and the dispatcher's
/// pacing and scaling are updated at the next tick.
pub fn spawn_dispatch_loop(
    mut dispatcher: Dispatcher,
    queue: Arc<IngestQueue>,
    mut settings: watch::Receiver<HostSettings>,
    session_id: Uuid,
) -> DispatchHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut tick_period = dispatcher.config().tick();
        let mut ticker = interval(tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(%session_id, tick_ms = tick_period.as_millis() as u64, "dispatch loop started");

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    // A dropped sender also means the connection is gone.
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if settings.has_changed().unwrap_or(false) {
                        let dispatch = settings.borrow_and_update().dispatch.clone();
                        if dispatch.tick() != tick_period {
                            tick_period = dispatch.tick();
                            ticker = interval(tick_period);
                            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        }
                        info!(%session_id, "dispatch settings updated");
                        dispatcher.update_config(dispatch);
                    }

                    let event = queue.pop();
                    dispatcher.tick(event, Instant::now().into_std());
                }
            }
        }

        let stats = queue.stats();
        debug!(
            %session_id,
            pushed = stats.pushed,
            evicted = stats.evicted,
            popped = stats.popped,
            left = queue.len(),
            "dispatch loop stopped"
        );
        dispatcher
    });

    DispatchHandle {
        shutdown: shutdown_tx,
        task,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
