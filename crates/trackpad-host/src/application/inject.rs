//! The input-injection port.
//!
//! The dispatcher expresses every semantic event as calls on
//! [`InputInjector`].  Platform adapters live in
//! `infrastructure::input_injection`.

use thiserror::Error;
use trackpad_core::MouseButton;

/// Error type for input injection operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InjectionError {
    /// The OS rejected or only partially applied the input.
    #[error("platform error: {0}")]
    Platform(String),

    /// No injection backend is available (no display, unsupported OS).
    #[error("input injection unavailable: {0}")]
    Unavailable(String),
}

/// Keys that appear in the hotkey chords the dispatcher sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Control,
    Alt,
    Shift,
    /// The Windows / Command / Meta key.
    Super,
    Tab,
    Plus,
    Minus,
    M,
}

/// Wheel axis for [`InputInjector::scroll_wheel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

/// Zoom in.
pub const ZOOM_IN_CHORD: &[Key] = &[Key::Control, Key::Plus];
/// Zoom out.
pub const ZOOM_OUT_CHORD: &[Key] = &[Key::Control, Key::Minus];
/// Switch to the next application window.
pub const NEXT_WINDOW_CHORD: &[Key] = &[Key::Alt, Key::Tab];
/// Minimize every window.
pub const MINIMIZE_ALL_CHORD: &[Key] = &[Key::Super, Key::M];
/// Restore minimized windows.
pub const RESTORE_ALL_CHORD: &[Key] = &[Key::Super, Key::Shift, Key::M];

/// Platform-agnostic input injection.
///
/// Calls are synchronous and best-effort: a failed call is reported once and
/// never retried.  Implementations must be shareable across connections.
#[cfg_attr(test, mockall::automock)]
pub trait InputInjector: Send + Sync {
    /// Moves the pointer relative to its current position, in pixels.
    fn move_pointer_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;

    /// Presses and releases a mouse button at the current pointer position.
    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError>;

    /// Scrolls by `amount` wheel units (120 per notch).  Positive is up or
    /// right.
    fn scroll_wheel(&self, axis: ScrollAxis, amount: i32) -> Result<(), InjectionError>;

    /// Presses the keys in order, then releases them in reverse order.
    fn send_hotkey(&self, keys: &[Key]) -> Result<(), InjectionError>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
