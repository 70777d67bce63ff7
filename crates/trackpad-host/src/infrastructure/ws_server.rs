//! Listener: accept loop, request routing, and per-connection sessions.
//!
//! This module is responsible for:
//!
//! 1. Binding one TCP listener for both the touch page and the WebSocket.
//! 2. Routing each connection by its request head (see [`super::http`]).
//! 3. Upgrading `/ws` connections and running one session per connection:
//!    a receive loop that decodes frames into the session's ingest queue,
//!    and a dispatch loop that drains the queue into the injector.
//! 4. Stopping the accept loop when the `running` flag is cleared.
//!
//! Every session owns a fresh queue and dispatcher; nothing is shared
//! between sessions except the injector handle and the settings store.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{future, Stream, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use trackpad_core::{decode_event, ProtocolError, SemanticEvent};

use crate::application::{
    spawn_dispatch_loop, Dispatcher, IngestQueue, InputInjector, SettingsStore,
};
use crate::domain::ServerConfig;
use crate::infrastructure::http::{
    classify_request_head, peek_request_head, respond, Route, MAX_HEAD_BYTES,
};
use crate::infrastructure::page::render_page;

/// How often the accept loop re-checks the `running` flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

/// Shared state handed to every connection task.
#[derive(Clone)]
pub struct ServerContext {
    pub settings: Arc<SettingsStore>,
    pub injector: Arc<dyn InputInjector>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the listener and serves until `running` is set to `false`.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn run_server(
    config: ServerConfig,
    settings: Arc<SettingsStore>,
    injector: Arc<dyn InputInjector>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {}", config.bind_addr))?;

    info!("remote trackpad listening on {}", config.bind_addr);

    serve(listener, ServerContext { settings, injector }, running).await;
    Ok(())
}

/// Runs the accept loop on an already-bound listener.
///
/// Split from [`run_server`] so tests can bind an ephemeral port first.
pub async fn serve(listener: TcpListener, context: ServerContext, running: Arc<AtomicBool>) {
    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("connection from {peer_addr}");
                let ctx = context.clone();
                tokio::spawn(async move {
                    handle_connection(stream, peer_addr, ctx).await;
                });
            }
            Ok(Err(e)) => {
                // Transient (e.g. out of file descriptors); keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {}
        }
    }
}

/// Decodes text frames from `frames` until the channel closes.
///
/// Frames that fail to decode are logged and skipped; they never end the
/// stream.  The stream ends on a Close frame, a transport error, or the end
/// of the underlying stream.
pub fn receive<S>(frames: S, session_id: Uuid) -> impl Stream<Item = SemanticEvent>
where
    S: Stream<Item = Result<WsMessage, WsError>>,
{
    frames
        .take_while(move |frame| {
            let open = match frame {
                Ok(WsMessage::Close(_)) => {
                    debug!(%session_id, "close frame received");
                    false
                }
                Ok(_) => true,
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => false,
                Err(e) => {
                    warn!(%session_id, "WebSocket error: {e}");
                    false
                }
            };
            future::ready(open)
        })
        .filter_map(move |frame| {
            let event = match frame {
                Ok(WsMessage::Text(text)) => decode_frame(&text, session_id),
                Ok(WsMessage::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                    Ok(text) => decode_frame(text, session_id),
                    Err(_) => {
                        warn!(%session_id, "non-UTF-8 binary frame dropped");
                        None
                    }
                },
                _ => None,
            };
            future::ready(event)
        })
}

// ── Per-connection handling ───────────────────────────────────────────────────

async fn handle_connection(mut stream: TcpStream, peer_addr: SocketAddr, ctx: ServerContext) {
    let mut head = vec![0u8; MAX_HEAD_BYTES];
    let len = match peek_request_head(&stream, &mut head).await {
        Ok(0) => return,
        Ok(n) => n,
        Err(e) => {
            debug!("{peer_addr}: failed to read request: {e}");
            return;
        }
    };

    let route = classify_request_head(&head[..len]);
    debug!("{peer_addr}: {route:?}");

    let result = match route {
        Route::WebSocket => {
            match run_session(stream, peer_addr, ctx).await {
                Ok(()) => info!("session {peer_addr} closed"),
                Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
            }
            return;
        }
        Route::Page => {
            let page = render_page(&ctx.settings.current().gesture);
            respond(&mut stream, len, 200, "text/html; charset=utf-8", &page).await
        }
        Route::UpgradeRequired => {
            respond(&mut stream, len, 426, "text/plain", "WebSocket upgrade required\n").await
        }
        Route::NotFound => respond(&mut stream, len, 404, "text/plain", "not found\n").await,
        Route::MethodNotAllowed => {
            respond(&mut stream, len, 405, "text/plain", "method not allowed\n").await
        }
        Route::Malformed => respond(&mut stream, len, 400, "text/plain", "bad request\n").await,
    };

    if let Err(e) = result {
        debug!("{peer_addr}: failed to write response: {e}");
    }
}

/// Runs one WebSocket session from handshake to teardown.
async fn run_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    ctx: ServerContext,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let session_id = Uuid::new_v4();
    info!(%session_id, "trackpad connected from {peer_addr}");

    let settings_rx = ctx.settings.subscribe();
    let dispatch = settings_rx.borrow().dispatch.clone();
    let queue = Arc::new(IngestQueue::new(dispatch.queue_capacity));
    let dispatcher = Dispatcher::new(
        Arc::clone(&ctx.injector),
        dispatch,
        tokio::time::Instant::now().into_std(),
    );
    let handle = spawn_dispatch_loop(dispatcher, Arc::clone(&queue), settings_rx, session_id);

    // The write half is never used: the host only listens.  Keeping it alive
    // lets tungstenite answer pings and close frames.
    let (_sink, frames) = ws_stream.split();
    let events = receive(frames, session_id);
    futures_util::pin_mut!(events);

    while let Some(event) = events.next().await {
        debug!(%session_id, kind = event.kind(), "received");
        if let Some(evicted) = queue.push(event) {
            debug!(%session_id, evicted = evicted.kind(), "ingest queue full; oldest event dropped");
        }
    }

    handle.stop().await;
    let stats = queue.stats();
    info!(
        %session_id,
        received = stats.pushed,
        dropped = stats.evicted,
        dispatched = stats.popped,
        "trackpad disconnected"
    );
    Ok(())
}

fn decode_frame(text: &str, session_id: Uuid) -> Option<SemanticEvent> {
    match decode_event(text) {
        Ok(event) => Some(event),
        Err(ProtocolError::UnknownType(kind)) => {
            debug!(%session_id, "unknown event type {kind:?} dropped");
            None
        }
        Err(e) => {
            warn!(%session_id, "dropped frame: {e}");
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
