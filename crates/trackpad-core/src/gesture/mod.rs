//! Gesture recognition: touch samples in, semantic events out.

pub mod config;
pub mod rails;
pub mod recognizer;
mod session;

pub use config::{GestureConfig, GestureConfigError};
pub use rails::{ScrollRail, ZoomRail};
pub use recognizer::GestureRecognizer;
