//! In-memory injector for tests.
//!
//! Every call is pushed into a `Mutex<Vec<...>>` so assertions can inspect
//! exactly what was injected and in what order.  Set `should_fail` to make
//! every call return [`InjectionError::Platform`].

use std::sync::{Mutex, MutexGuard};

use trackpad_core::MouseButton;

use crate::application::{InjectionError, InputInjector, Key, ScrollAxis};

/// One recorded injector call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injected {
    Move(i32, i32),
    Click(MouseButton),
    Scroll(ScrollAxis, i32),
    Hotkey(Vec<Key>),
}

/// Injector that records calls instead of touching the OS.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    calls: Mutex<Vec<Injected>>,
    /// When `true`, every method returns an error and records nothing.
    pub should_fail: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Injected> {
        self.lock().clone()
    }

    /// Sum of all recorded pointer moves.
    pub fn total_motion(&self) -> (i32, i32) {
        self.lock().iter().fold((0, 0), |(x, y), call| match call {
            Injected::Move(dx, dy) => (x + dx, y + dy),
            _ => (x, y),
        })
    }

    /// Calls other than pointer moves.
    pub fn discrete_calls(&self) -> Vec<Injected> {
        self.lock()
            .iter()
            .filter(|call| !matches!(call, Injected::Move(..)))
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Injected>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: Injected) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("recording injector set to fail".into()));
        }
        self.lock().push(call);
        Ok(())
    }
}

impl InputInjector for RecordingInjector {
    fn move_pointer_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        self.record(Injected::Move(dx, dy))
    }

    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        self.record(Injected::Click(button))
    }

    fn scroll_wheel(&self, axis: ScrollAxis, amount: i32) -> Result<(), InjectionError> {
        self.record(Injected::Scroll(axis, amount))
    }

    fn send_hotkey(&self, keys: &[Key]) -> Result<(), InjectionError> {
        self.record(Injected::Hotkey(keys.to_vec()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
