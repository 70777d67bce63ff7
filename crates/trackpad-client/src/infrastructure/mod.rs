//! Infrastructure layer for trackpad-client.
//!
//! - `channel`: the reconnecting WebSocket to the host.  Implements the
//!   application layer's [`EventSink`](crate::application::EventSink).
//! - `touch_feed`: JSON-lines touch samples from a file or stdin.

pub mod channel;
pub mod touch_feed;

pub use channel::{ChannelConfig, ChannelError, ChannelState, ReconnectingChannel};
pub use touch_feed::{parse_feed_line, spawn_feed_reader, FeedError, Replay};
