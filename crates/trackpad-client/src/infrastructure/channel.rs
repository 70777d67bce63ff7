//! Auto-reconnecting WebSocket channel to the host.
//!
//! [`ReconnectingChannel::open`] spawns a single connection task that owns
//! the socket for its whole life:
//!
//! ```text
//! Connecting ──ok──▶ Open ──closed/error──▶ Reconnecting ──delay──▶ (connect again)
//!      │                                          ▲
//!      └──────────────failed──────────────────────┘
//! ```
//!
//! Retries use a fixed delay, forever, with no backoff.  Because only the
//! one task ever connects, there are never two live connections.
//!
//! Sending is fire-and-forget.  An event sent while the channel is not open
//! is dropped, and frames still queued when a connection drops are
//! discarded.  [`ReconnectingChannel::buffered_amount`] counts frames
//! accepted but not yet written, so callers can hold back while the socket
//! is congested.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

use trackpad_core::{encode_event, ProtocolError, SemanticEvent};

use crate::application::EventSink;

/// Default host endpoint.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:5000/ws";

/// Error type for the transport channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The URL is not a valid WebSocket URL.
    #[error("invalid WebSocket URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The event could not be encoded.
    #[error(transparent)]
    Encode(#[from] ProtocolError),

    /// The channel is not open; the event was dropped.
    #[error("channel is {0:?}; event dropped")]
    NotOpen(ChannelState),

    /// The outbound buffer is full; the event was dropped.
    #[error("outbound buffer full; event dropped")]
    Full,
}

/// Observable connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// First connection attempt in progress.
    Connecting,
    Open,
    /// Waiting out the retry delay, or connecting again after a drop.
    Reconnecting,
    /// `close()` was called; the connection task has exited.
    Closed,
}

/// Channel settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub url: String,
    /// Fixed wait between a failed or dropped connection and the next attempt.
    pub reconnect_delay: Duration,
    /// Frames that may wait for the socket before `send` starts dropping.
    pub outbound_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            reconnect_delay: Duration::from_secs(1),
            outbound_capacity: 16,
        }
    }
}

/// Client end of the transport channel.
pub struct ReconnectingChannel {
    outbound: mpsc::Sender<String>,
    buffered: Arc<AtomicUsize>,
    attempts: Arc<AtomicU64>,
    state: watch::Receiver<ChannelState>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReconnectingChannel {
    /// Starts the connection task.  Returns immediately; the first
    /// connection attempt runs in the background.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidUrl`] if `config.url` cannot be used
    /// as a WebSocket request.
    pub fn open(config: ChannelConfig) -> Result<Self, ChannelError> {
        config
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| ChannelError::InvalidUrl {
                url: config.url.clone(),
                reason: e.to_string(),
            })?;

        let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_capacity.max(1));
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let buffered = Arc::new(AtomicUsize::new(0));
        let attempts = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn(connection_loop(
            config,
            outbound_rx,
            Arc::clone(&buffered),
            Arc::clone(&attempts),
            state_tx,
            shutdown_rx,
        ));

        Ok(Self {
            outbound: outbound_tx,
            buffered,
            attempts,
            state: state_rx,
            shutdown: shutdown_tx,
            task,
        })
    }

    /// Queues `event` for sending.
    ///
    /// # Errors
    ///
    /// Returns an error, and drops the event, if the channel is not open or
    /// the outbound buffer is full.
    pub fn send(&self, event: &SemanticEvent) -> Result<(), ChannelError> {
        let state = self.state();
        if state != ChannelState::Open {
            return Err(ChannelError::NotOpen(state));
        }
        let frame = encode_event(event)?;
        self.buffered.fetch_add(1, Ordering::SeqCst);
        self.outbound.try_send(frame).map_err(|_| {
            self.buffered.fetch_sub(1, Ordering::SeqCst);
            ChannelError::Full
        })
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// A receiver that sees every later state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// Waits until the channel is open.  Returns `false` if it closed first.
    pub async fn wait_open(&self) -> bool {
        let mut state = self.state.clone();
        let result = state
            .wait_for(|s| matches!(s, ChannelState::Open | ChannelState::Closed))
            .await
            .map(|s| *s == ChannelState::Open);
        result.unwrap_or(false)
    }

    /// Frames accepted by `send` and not yet written to the socket.
    pub fn buffered_amount(&self) -> usize {
        self.buffered.load(Ordering::SeqCst)
    }

    /// Connection attempts made so far, including the first.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Stops reconnecting, closes the socket, and waits for the task to end.
    pub async fn close(self) {
        // The task may already be gone; nothing to signal then.
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("channel task ended abnormally: {e}");
        }
    }
}

impl EventSink for ReconnectingChannel {
    fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    fn buffered_amount(&self) -> usize {
        ReconnectingChannel::buffered_amount(self)
    }

    fn send(&self, event: SemanticEvent) {
        if let Err(e) = ReconnectingChannel::send(self, &event) {
            debug!(kind = event.kind(), "send skipped: {e}");
        }
    }
}

// ── Connection task ───────────────────────────────────────────────────────────

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How a connection ended.
enum Ended {
    /// Shutdown requested, or the channel handle was dropped.
    Stopped,
    /// The peer closed or the socket failed.
    Dropped,
}

async fn connection_loop(
    config: ChannelConfig,
    mut outbound: mpsc::Receiver<String>,
    buffered: Arc<AtomicUsize>,
    attempts: Arc<AtomicU64>,
    state: watch::Sender<ChannelState>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(attempt, url = %config.url, "connecting");

        let connected = tokio::select! {
            biased;
            _ = stop_requested(&mut shutdown) => break,
            result = connect_async(config.url.as_str()) => result,
        };

        match connected {
            Ok((socket, _response)) => {
                info!(attempt, "connected to {}", config.url);
                state.send_replace(ChannelState::Open);
                let ended = run_connection(socket, &mut outbound, &buffered, &mut shutdown).await;
                state.send_replace(ChannelState::Reconnecting);
                discard_queued(&mut outbound, &buffered);
                if matches!(ended, Ended::Stopped) {
                    break;
                }
                info!(
                    "connection to {} lost; reconnecting in {:?}",
                    config.url, config.reconnect_delay
                );
            }
            Err(e) => {
                state.send_replace(ChannelState::Reconnecting);
                warn!(
                    attempt,
                    "could not connect to {}: {e}; retrying in {:?}",
                    config.url,
                    config.reconnect_delay
                );
            }
        }

        tokio::select! {
            biased;
            _ = stop_requested(&mut shutdown) => break,
            _ = tokio::time::sleep(config.reconnect_delay) => {}
        }
    }

    state.send_replace(ChannelState::Closed);
    debug!("channel task stopped");
}

async fn run_connection(
    socket: Socket,
    outbound: &mut mpsc::Receiver<String>,
    buffered: &AtomicUsize,
    shutdown: &mut watch::Receiver<bool>,
) -> Ended {
    let (mut sink, mut incoming) = socket.split();

    loop {
        tokio::select! {
            biased;

            _ = stop_requested(shutdown) => {
                // Best-effort close handshake; the task is ending either way.
                let _ = sink.send(Message::Close(None)).await;
                return Ended::Stopped;
            }
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    return Ended::Stopped;
                };
                let result = sink.send(Message::Text(frame)).await;
                buffered.fetch_sub(1, Ordering::SeqCst);
                if let Err(e) = result {
                    warn!("send failed: {e}");
                    return Ended::Dropped;
                }
            }
            message = incoming.next() => match message {
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "host closed the channel");
                    return Ended::Dropped;
                }
                // The host never sends application data; pings are answered
                // by tungstenite on the next write.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("receive failed: {e}");
                    return Ended::Dropped;
                }
                None => return Ended::Dropped,
            },
        }
    }
}

/// Resolves once shutdown is requested or the channel handle is dropped.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Drops frames that were queued for a connection that no longer exists.
fn discard_queued(outbound: &mut mpsc::Receiver<String>, buffered: &AtomicUsize) {
    let mut discarded = 0usize;
    while outbound.try_recv().is_ok() {
        buffered.fetch_sub(1, Ordering::SeqCst);
        discarded += 1;
    }
    if discarded > 0 {
        debug!(discarded, "dropped frames queued for a lost connection");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
