//! Bounded FIFO between the receive loop and the dispatch loop.
//!
//! The receive loop must never wait for the dispatcher, so a full queue
//! evicts its oldest event to admit the newest.  Only the freshest intent
//! matters for a pointer: a stale move is worth less than a new one.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use trackpad_core::SemanticEvent;

/// Counters for one queue's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub pushed: u64,
    pub evicted: u64,
    pub popped: u64,
}

/// Fixed-capacity, evict-oldest event queue.  Shared by reference between
/// one receive loop and one dispatch loop.
#[derive(Debug)]
pub struct IngestQueue {
    events: Mutex<VecDeque<SemanticEvent>>,
    capacity: usize,
    pushed: AtomicU64,
    evicted: AtomicU64,
    popped: AtomicU64,
}

impl IngestQueue {
    /// Creates a queue holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            pushed: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            popped: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `event`, returning the evicted oldest event if the queue was full.
    pub fn push(&self, event: SemanticEvent) -> Option<SemanticEvent> {
        let mut events = self.lock();
        let evicted = if events.len() >= self.capacity {
            events.pop_front()
        } else {
            None
        };
        events.push_back(event);
        drop(events);

        self.pushed.fetch_add(1, Ordering::Relaxed);
        if evicted.is_some() {
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }
        evicted
    }

    /// Removes and returns the oldest event.
    pub fn pop(&self) -> Option<SemanticEvent> {
        let event = self.lock().pop_front();
        if event.is_some() {
            self.popped.fetch_add(1, Ordering::Relaxed);
        }
        event
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies the queued events, oldest first, without removing them.
    pub fn snapshot(&self) -> Vec<SemanticEvent> {
        self.lock().iter().copied().collect()
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            pushed: self.pushed.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            popped: self.popped.load(Ordering::Relaxed),
        }
    }

    // A panic while holding the lock cannot leave the deque half-updated, so
    // a poisoned lock is still safe to use.
    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<SemanticEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
