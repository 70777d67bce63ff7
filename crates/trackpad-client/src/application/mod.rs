//! Application layer for trackpad-client.
//!
//! | Module        | Role                                                   |
//! |---------------|--------------------------------------------------------|
//! | `pacer`       | Holds one pending event; releases it at a bounded rate |
//! | `client_loop` | Feeds samples to the recognizer and drains the pacer   |

pub mod client_loop;
pub mod pacer;

pub use client_loop::{ClientLoop, ClientStats, EventSink};
pub use pacer::{PacerStats, SendPacer};
