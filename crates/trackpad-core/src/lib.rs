//! # trackpad-core
//!
//! Shared library for the remote trackpad containing the touch data model,
//! the semantic event wire format, and the gesture recognizer.
//!
//! This crate is used by both the host and the client applications.
//! It has zero dependencies on OS APIs, async runtimes, or network sockets.
//!
//! # Architecture overview
//!
//! A handheld touch device acts as a trackpad for a host computer.  The
//! client turns raw multi-touch samples into *semantic events* ("move the
//! pointer by 4,-2", "switch window"), ships them to the host one message at
//! a time, and the host injects them as real input.
//!
//! - **`touch`** – Raw samples: every finger currently on a surface, with a
//!   timestamp.
//!
//! - **`protocol`** – The [`SemanticEvent`] enum and its JSON wire codec.
//!   Decoding distinguishes malformed payloads from unknown event types so
//!   the host can log them separately.
//!
//! - **`gesture`** – The stateful recognizer that turns a stream of samples
//!   into semantic events: single-finger drag and tap, two-finger scroll,
//!   three-finger swipes, and the scroll/zoom rails.

pub mod gesture;
pub mod protocol;
pub mod touch;

// Re-export the most-used types at the crate root so callers can write
// `trackpad_core::SemanticEvent` instead of the full module path.
pub use gesture::{GestureConfig, GestureConfigError, GestureRecognizer};
pub use protocol::codec::{decode_event, encode_event, ProtocolError};
pub use protocol::event::{MouseButton, SemanticEvent, VerticalDirection};
pub use touch::{TouchId, TouchPoint, TouchSample, TouchSurface};
