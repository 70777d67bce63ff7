//! Injector that only logs.
//!
//! Used with `--dry-run`, and as the fallback when no native backend can be
//! opened, so the page and the event pipeline can be exercised on a machine
//! whose input must not be touched.

use tracing::info;
use trackpad_core::MouseButton;

use crate::application::{InjectionError, InputInjector, Key, ScrollAxis};

#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunInjector;

impl InputInjector for DryRunInjector {
    fn move_pointer_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        info!(dx, dy, "[dry-run] move pointer");
        Ok(())
    }

    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        info!(?button, "[dry-run] click");
        Ok(())
    }

    fn scroll_wheel(&self, axis: ScrollAxis, amount: i32) -> Result<(), InjectionError> {
        info!(?axis, amount, "[dry-run] scroll");
        Ok(())
    }

    fn send_hotkey(&self, keys: &[Key]) -> Result<(), InjectionError> {
        info!(?keys, "[dry-run] hotkey");
        Ok(())
    }
}
