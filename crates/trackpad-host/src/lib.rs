//! trackpad-host library crate.
//!
//! The host is the computer being controlled.  It serves the touch page to a
//! phone on the same network, accepts one WebSocket channel per open page,
//! and replays the semantic events it receives as native input.
//!
//! # Architecture
//!
//! ```text
//! Phone browser (touch page, JSON over WebSocket)
//!         ↕
//! [trackpad-host]
//!   ├── domain/           Settings types: HostSettings, DispatchConfig, ServerConfig
//!   ├── application/      Ingest queue, movement smoother, dispatcher, dispatch loop,
//!   │                     InputInjector port, live settings store
//!   └── infrastructure/
//!         ├── ws_server/        Accept loop, HTTP routing, per-connection sessions
//!         ├── http/             Request-line classification and plain responses
//!         ├── page/             Touch page rendering
//!         ├── input_injection/  XTest / SendInput / dry-run / recording injectors
//!         └── storage/          TOML settings file
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `trackpad-core`; its only async
//!   code is the dispatch loop, and it reaches the OS only through the
//!   [`application::inject::InputInjector`] trait.
//! - `infrastructure` owns sockets, files, and platform APIs.

/// Domain layer: settings types.
pub mod domain;

/// Application layer: queueing, smoothing, dispatch.
pub mod application;

/// Infrastructure layer: network server, page, platform injectors, storage.
pub mod infrastructure;
