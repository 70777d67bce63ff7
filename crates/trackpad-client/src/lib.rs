//! trackpad-client library crate.
//!
//! The client is the touch side of the remote trackpad.  It turns raw touch
//! samples into semantic events with the shared recognizer, paces them so
//! the channel never builds a backlog, and keeps a WebSocket to the host
//! open across network drops.
//!
//! # Architecture
//!
//! ```text
//! touch feed (JSON lines)
//!         │
//! [trackpad-client]
//!   ├── application/      SendPacer (most-recent-wins), ClientLoop, EventSink port
//!   └── infrastructure/
//!         ├── channel/      Reconnecting WebSocket channel
//!         └── touch_feed/   JSON-lines touch sample reader
//!         │
//!         ↓  one JSON event per WebSocket message
//! [trackpad-host]
//! ```

/// Application layer: pacing and the client loop.
pub mod application;

/// Infrastructure layer: WebSocket channel and touch feed.
pub mod infrastructure;
