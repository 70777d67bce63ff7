//! JSON-lines touch sample feed.
//!
//! Each line is one sample from one surface:
//!
//! ```text
//! {"surface":"trackpad","t":12.5,"touches":[{"id":0,"x":10.0,"y":20.0}]}
//! {"surface":"zoomRail","t":30.0,"touches":[]}
//! ```
//!
//! `surface` defaults to `"trackpad"` and `touches` to an empty list (all
//! fingers lifted).  `t` is in milliseconds and must not go backwards.
//! Blank lines and lines starting with `#` are ignored.  Invalid lines are
//! logged and skipped; they never end the feed.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use trackpad_core::{TouchPoint, TouchSample, TouchSurface};

/// Error type for one feed line.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: timestamp {value} is not a finite, non-negative number")]
    InvalidTimestamp { line: usize, value: f64 },

    #[error("line {line}: timestamp {value} ms is earlier than the previous sample")]
    OutOfOrder { line: usize, value: f64 },
}

/// How quickly samples are released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// Release each sample at its `t` relative to the first sample.
    Realtime,
    /// Release samples as soon as they are read.
    Immediate,
}

#[derive(Debug, Deserialize)]
struct FeedLine {
    #[serde(default)]
    surface: TouchSurface,
    t: f64,
    #[serde(default)]
    touches: Vec<TouchPoint>,
}

/// Parses one feed line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`FeedError::Json`] for malformed lines and
/// [`FeedError::InvalidTimestamp`] for a negative or non-finite `t`.
pub fn parse_feed_line(
    line_no: usize,
    text: &str,
) -> Result<Option<(TouchSurface, TouchSample)>, FeedError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let line: FeedLine = serde_json::from_str(text).map_err(|source| FeedError::Json {
        line: line_no,
        source,
    })?;
    if !line.t.is_finite() || line.t < 0.0 {
        return Err(FeedError::InvalidTimestamp {
            line: line_no,
            value: line.t,
        });
    }

    let timestamp = Duration::from_secs_f64(line.t / 1000.0);
    Ok(Some((line.surface, TouchSample::new(timestamp, line.touches))))
}

/// Reads samples from `reader` on a background task.
///
/// The returned receiver yields samples in order and closes at end of
/// input, on a read error, or when it is dropped.
pub fn spawn_feed_reader<R>(
    reader: R,
    replay: Replay,
    capacity: usize,
) -> (mpsc::Receiver<(TouchSurface, TouchSample)>, JoinHandle<()>)
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));

    let task = tokio::spawn(async move {
        let mut lines = reader.lines();
        let mut line_no = 0usize;
        let mut last: Option<Duration> = None;
        let mut origin: Option<(Instant, Duration)> = None;

        loop {
            let text = match lines.next_line().await {
                Ok(Some(text)) => text,
                Ok(None) => break,
                Err(e) => {
                    warn!("touch feed read error: {e}");
                    break;
                }
            };
            line_no += 1;

            let (surface, sample) = match parse_feed_line(line_no, &text) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => continue,
                Err(e) => {
                    warn!("skipping touch feed line: {e}");
                    continue;
                }
            };
            if last.is_some_and(|prev| sample.timestamp < prev) {
                let e = FeedError::OutOfOrder {
                    line: line_no,
                    value: sample.timestamp.as_secs_f64() * 1000.0,
                };
                warn!("skipping touch feed line: {e}");
                continue;
            }
            last = Some(sample.timestamp);

            if replay == Replay::Realtime {
                let (start, first) = *origin.get_or_insert((Instant::now(), sample.timestamp));
                tokio::time::sleep_until(start + (sample.timestamp - first)).await;
            }

            if tx.send((surface, sample)).await.is_err() {
                break;
            }
        }
        debug!(lines = line_no, "touch feed reader finished");
    });

    (rx, task)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
