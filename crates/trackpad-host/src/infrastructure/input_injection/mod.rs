//! Input-injection adapters.
//!
//! The native adapter is selected at compile time via `#[cfg(target_os = ...)]`.
//! [`DryRunInjector`] and [`RecordingInjector`] are available everywhere.

use std::sync::Arc;

use crate::application::{InjectionError, InputInjector};

pub mod dry_run;
pub mod recording;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

pub use dry_run::DryRunInjector;
pub use recording::RecordingInjector;

/// Opens the injector for the current platform.
///
/// # Errors
///
/// Returns [`InjectionError::Unavailable`] when the platform has no backend
/// or the backend cannot be initialised (e.g. no X display).
pub fn native_injector() -> Result<Arc<dyn InputInjector>, InjectionError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Arc::new(windows::WindowsInjector::new()))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(Arc::new(linux::LinuxXTestInjector::open()?))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        Err(InjectionError::Unavailable(format!(
            "no input backend for {}",
            std::env::consts::OS
        )))
    }
}
