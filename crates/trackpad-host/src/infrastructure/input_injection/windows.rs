//! Windows input injection via `SendInput`.
//!
//! Pointer motion is relative (`MOUSEEVENTF_MOVE` without `ABSOLUTE`), so
//! the host never normalises to the virtual-screen range.  Wheel amounts are
//! passed through in wheel units; Windows already uses 120 per notch.

#![cfg(target_os = "windows")]

use trackpad_core::MouseButton;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, MOUSEEVENTF_HWHEEL, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_MOVE,
    MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL, MOUSEINPUT, MOUSE_EVENT_FLAGS,
    VIRTUAL_KEY, VK_CONTROL, VK_LWIN, VK_MENU, VK_OEM_MINUS, VK_OEM_PLUS, VK_SHIFT, VK_TAB,
};

use crate::application::{InjectionError, InputInjector, Key, ScrollAxis};

/// Windows implementation of [`InputInjector`] using `SendInput`.
#[derive(Debug, Default)]
pub struct WindowsInjector;

impl WindowsInjector {
    pub fn new() -> Self {
        Self
    }
}

impl InputInjector for WindowsInjector {
    fn move_pointer_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        send(&[mouse_input(dx, dy, 0, MOUSEEVENTF_MOVE)])
    }

    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        let (down, up) = match button {
            MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
            MouseButton::Middle => (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
        };
        send(&[mouse_input(0, 0, 0, down), mouse_input(0, 0, 0, up)])
    }

    fn scroll_wheel(&self, axis: ScrollAxis, amount: i32) -> Result<(), InjectionError> {
        if amount == 0 {
            return Ok(());
        }
        let flags = match axis {
            ScrollAxis::Vertical => MOUSEEVENTF_WHEEL,
            ScrollAxis::Horizontal => MOUSEEVENTF_HWHEEL,
        };
        // mouseData is a DWORD that Windows reads back as a signed delta.
        send(&[mouse_input(0, 0, amount as u32, flags)])
    }

    fn send_hotkey(&self, keys: &[Key]) -> Result<(), InjectionError> {
        let presses = keys.iter().map(|&key| key_input(key, false));
        let releases = keys.iter().rev().map(|&key| key_input(key, true));
        let inputs: Vec<INPUT> = presses.chain(releases).collect();
        send(&inputs)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn virtual_key(key: Key) -> VIRTUAL_KEY {
    match key {
        Key::Control => VK_CONTROL,
        Key::Alt => VK_MENU,
        Key::Shift => VK_SHIFT,
        Key::Super => VK_LWIN,
        Key::Tab => VK_TAB,
        Key::Plus => VK_OEM_PLUS,
        Key::Minus => VK_OEM_MINUS,
        Key::M => VIRTUAL_KEY(0x4D),
    }
}

fn mouse_input(dx: i32, dy: i32, mouse_data: u32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: mouse_data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn key_input(key: Key, key_up: bool) -> INPUT {
    let mut flags = KEYBD_EVENT_FLAGS::default();
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    // The Windows keys sit on the extended scan-code page.
    if key == Key::Super {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: virtual_key(key),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Submits `inputs` as one batch and checks that all were inserted.
fn send(inputs: &[INPUT]) -> Result<(), InjectionError> {
    // SAFETY: every INPUT is fully initialised and the size matches the type.
    let inserted = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if inserted as usize == inputs.len() {
        Ok(())
    } else {
        Err(InjectionError::Platform(format!(
            "SendInput inserted {inserted} of {} events (blocked by UIPI?)",
            inputs.len()
        )))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_keys_match_win32_codes() {
        assert_eq!(virtual_key(Key::Control).0, 0x11);
        assert_eq!(virtual_key(Key::Alt).0, 0x12);
        assert_eq!(virtual_key(Key::Super).0, 0x5B);
        assert_eq!(virtual_key(Key::Plus).0, 0xBB);
        assert_eq!(virtual_key(Key::M).0, 0x4D);
    }

    #[test]
    fn test_negative_wheel_amount_keeps_twos_complement() {
        let input = mouse_input(0, 0, -120i32 as u32, MOUSEEVENTF_WHEEL);
        // SAFETY: the union was written through its `mi` variant.
        let data = unsafe { input.Anonymous.mi.mouseData };
        assert_eq!(data as i32, -120);
    }
}
