//! Application layer for trackpad-host.
//!
//! | Module          | Role                                                    |
//! |-----------------|---------------------------------------------------------|
//! | `ingest_queue`  | Bounded evict-oldest FIFO fed by the receive loop       |
//! | `smoother`      | Accumulates pointer deltas, flushes at a bounded rate   |
//! | `dispatch`      | Routes one event per tick to the injector               |
//! | `dispatch_loop` | Per-connection fixed-cadence task around the dispatcher |
//! | `inject`        | The `InputInjector` port and hotkey chords              |
//! | `settings`      | Live settings published to every connection             |

pub mod dispatch;
pub mod dispatch_loop;
pub mod ingest_queue;
pub mod inject;
pub mod settings;
pub mod smoother;

pub use dispatch::Dispatcher;
pub use dispatch_loop::{spawn_dispatch_loop, DispatchHandle};
pub use ingest_queue::{IngestQueue, QueueStats};
pub use inject::{InjectionError, InputInjector, Key, ScrollAxis};
pub use settings::SettingsStore;
pub use smoother::{MovementSmoother, SmoothedDelta};
