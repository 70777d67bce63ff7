//! Infrastructure layer for trackpad-host.
//!
//! Contains OS-facing adapters: the page and WebSocket listener, native
//! input injection, and settings file storage.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain`, and
//! `trackpad_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod http;
pub mod input_injection;
pub mod page;
pub mod storage;
pub mod ws_server;

pub use ws_server::{run_server, serve, ServerContext};
