//! Live host settings shared by every connection.
//!
//! Settings are published through a `tokio::sync::watch` channel.  The page
//! handler reads the current value when it renders; each dispatch loop holds
//! a receiver and applies a change at its next tick.

use tokio::sync::watch;
use tracing::info;

use crate::domain::{HostSettings, SettingsError};

/// Single writer of the current [`HostSettings`].
#[derive(Debug)]
pub struct SettingsStore {
    tx: watch::Sender<HostSettings>,
}

impl SettingsStore {
    pub fn new(initial: HostSettings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Returns a copy of the current settings.
    pub fn current(&self) -> HostSettings {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<HostSettings> {
        self.tx.subscribe()
    }

    /// Validates and publishes new settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] and keeps the old settings if validation fails.
    pub fn update(&self, settings: HostSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        // `send_replace` succeeds even with no live receivers.
        self.tx.send_replace(settings);
        info!(
            receivers = self.tx.receiver_count(),
            "published new host settings"
        );
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(HostSettings::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_is_visible_to_subscribers() {
        // Arrange
        let store = SettingsStore::default();
        let mut rx = store.subscribe();
        let mut next = HostSettings::default();
        next.gesture.move_sensitivity = 5.0;

        // Act
        store.update(next.clone()).unwrap();

        // Assert
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), next);
        assert_eq!(store.current(), next);
    }

    #[test]
    fn test_invalid_update_keeps_previous_settings() {
        let store = SettingsStore::default();
        let rx = store.subscribe();
        let mut bad = HostSettings::default();
        bad.dispatch.tick_ms = 0;

        assert!(store.update(bad).is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.current(), HostSettings::default());
    }

    #[test]
    fn test_update_without_subscribers_still_applies() {
        let store = SettingsStore::default();
        let mut next = HostSettings::default();
        next.dispatch.queue_capacity = 3;

        store.update(next).unwrap();

        assert_eq!(store.current().dispatch.queue_capacity, 3);
    }
}
