//! Linux X11 input injection via the XTest extension.
//!
//! Pointer motion uses `XTestFakeRelativeMotionEvent`, so the host never
//! needs to know the screen geometry.  X11 has no wheel API: a scroll is a
//! press/release pair on buttons 4-7, one pair per 120-unit notch.
//!
//! | Button | Scroll direction |
//! |--------|------------------|
//! | 4      | Up               |
//! | 5      | Down             |
//! | 6      | Left             |
//! | 7      | Right            |
//!
//! Hotkey keys are resolved KeySym → keycode with `XKeysymToKeycode` on
//! every call, so keyboard layout changes are picked up.
//!
//! # Permissions
//!
//! The process needs access to the display named by `DISPLAY`.  When it is
//! unset or the server refuses the connection, [`LinuxXTestInjector::open`]
//! fails with [`InjectionError::Unavailable`].

use std::os::raw::{c_int, c_uint, c_ulong};
use std::ptr;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;
use trackpad_core::MouseButton;
use x11::{xlib, xtest};

use crate::application::{InjectionError, InputInjector, Key, ScrollAxis};

/// `CurrentTime`: deliver synthesized events immediately.
const CURRENT_TIME: c_ulong = 0;

/// One wheel notch in wheel units.
const WHEEL_NOTCH: u32 = 120;

// KeySyms from X11/keysymdef.h.
const XK_CONTROL_L: c_ulong = 0xffe3;
const XK_ALT_L: c_ulong = 0xffe9;
const XK_SHIFT_L: c_ulong = 0xffe1;
const XK_SUPER_L: c_ulong = 0xffeb;
const XK_TAB: c_ulong = 0xff09;
const XK_PLUS: c_ulong = 0x002b;
const XK_MINUS: c_ulong = 0x002d;
const XK_M: c_ulong = 0x006d;

/// Owned X display connection.
struct Display(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced by Xlib while the surrounding
// Mutex is held, so at most one thread uses the connection at a time.
unsafe impl Send for Display {}

impl Drop for Display {
    fn drop(&mut self) {
        // SAFETY: the pointer came from XOpenDisplay and is closed exactly once.
        unsafe {
            xlib::XCloseDisplay(self.0);
        }
    }
}

/// Linux X11/XTest input injector.
pub struct LinuxXTestInjector {
    display: Mutex<Display>,
}

impl LinuxXTestInjector {
    /// Connects to the X display named by `DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Unavailable`] if the display cannot be opened.
    pub fn open() -> Result<Self, InjectionError> {
        // SAFETY: a null name means "use $DISPLAY"; the result is checked.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(InjectionError::Unavailable(
                "cannot open X display (is DISPLAY set?)".into(),
            ));
        }
        debug!("connected to X display");
        Ok(Self {
            display: Mutex::new(Display(display)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Display> {
        self.display
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InputInjector for LinuxXTestInjector {
    fn move_pointer_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        let display = self.lock();
        // SAFETY: the display is open for the lifetime of `self`.
        let status =
            unsafe { xtest::XTestFakeRelativeMotionEvent(display.0, dx, dy, CURRENT_TIME) };
        check(status, "XTestFakeRelativeMotionEvent")?;
        flush(&display);
        Ok(())
    }

    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        let display = self.lock();
        press_and_release(&display, x_button(button))?;
        flush(&display);
        Ok(())
    }

    fn scroll_wheel(&self, axis: ScrollAxis, amount: i32) -> Result<(), InjectionError> {
        if amount == 0 {
            return Ok(());
        }
        let button = match (axis, amount > 0) {
            (ScrollAxis::Vertical, true) => 4,
            (ScrollAxis::Vertical, false) => 5,
            (ScrollAxis::Horizontal, true) => 7,
            (ScrollAxis::Horizontal, false) => 6,
        };

        let display = self.lock();
        for _ in 0..notches(amount) {
            press_and_release(&display, button)?;
        }
        flush(&display);
        Ok(())
    }

    fn send_hotkey(&self, keys: &[Key]) -> Result<(), InjectionError> {
        let display = self.lock();
        let codes = keys
            .iter()
            .map(|&key| keycode(&display, key))
            .collect::<Result<Vec<_>, _>>()?;

        let result = press_chord(&codes, |code, down| {
            let is_press = if down { xlib::True } else { xlib::False };
            // SAFETY: the display is open; `code` came from XKeysymToKeycode.
            let status =
                unsafe { xtest::XTestFakeKeyEvent(display.0, code, is_press, CURRENT_TIME) };
            check(status, "XTestFakeKeyEvent")
        });
        flush(&display);
        result
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn x_button(button: MouseButton) -> c_uint {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
    }
}

fn keysym(key: Key) -> c_ulong {
    match key {
        Key::Control => XK_CONTROL_L,
        Key::Alt => XK_ALT_L,
        Key::Shift => XK_SHIFT_L,
        Key::Super => XK_SUPER_L,
        Key::Tab => XK_TAB,
        Key::Plus => XK_PLUS,
        Key::Minus => XK_MINUS,
        Key::M => XK_M,
    }
}

/// Whole notches in `amount`, at least one.
fn notches(amount: i32) -> u32 {
    (amount.unsigned_abs() / WHEEL_NOTCH).max(1)
}

fn keycode(display: &Display, key: Key) -> Result<c_uint, InjectionError> {
    // SAFETY: the display is open.
    let code = unsafe { xlib::XKeysymToKeycode(display.0, keysym(key)) };
    if code == 0 {
        return Err(InjectionError::Platform(format!(
            "no keycode for {key:?} in the current keymap"
        )));
    }
    Ok(c_uint::from(code))
}

fn press_and_release(display: &Display, button: c_uint) -> Result<(), InjectionError> {
    // SAFETY: the display is open.
    let status =
        unsafe { xtest::XTestFakeButtonEvent(display.0, button, xlib::True, CURRENT_TIME) };
    check(status, "XTestFakeButtonEvent")?;
    // SAFETY: as above.
    let status =
        unsafe { xtest::XTestFakeButtonEvent(display.0, button, xlib::False, CURRENT_TIME) };
    check(status, "XTestFakeButtonEvent")
}

fn flush(display: &Display) {
    // SAFETY: the display is open.
    unsafe {
        xlib::XFlush(display.0);
    }
}

/// XTest calls return zero on failure.
/// Presses `codes` in order, then releases every key that went down in
/// reverse order.
///
/// A failed press stops further presses but never skips the release pass,
/// so no modifier is left held.  Returns the first error.
fn press_chord<C: Copy>(
    codes: &[C],
    mut fake_key: impl FnMut(C, bool) -> Result<(), InjectionError>,
) -> Result<(), InjectionError> {
    let mut first_error = None;
    let mut pressed = 0;
    for &code in codes {
        match fake_key(code, true) {
            Ok(()) => pressed += 1,
            Err(e) => {
                first_error = Some(e);
                break;
            }
        }
    }
    for &code in codes[..pressed].iter().rev() {
        if let Err(e) = fake_key(code, false) {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn check(status: c_int, call: &str) -> Result<(), InjectionError> {
    if status == 0 {
        Err(InjectionError::Platform(format!("{call} failed")))
    } else {
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
