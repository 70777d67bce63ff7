//! Integration tests for the reconnecting transport channel.
//!
//! # Purpose
//!
//! These tests run [`ReconnectingChannel`] against a real local listener and
//! verify:
//!
//! - Events sent while open arrive as one JSON text message each.
//! - When the host drops the connection, the channel reconnects after its
//!   fixed delay, and there is never more than one live connection.
//! - With no host at all, attempts continue at the fixed delay forever.
//! - `close()` ends the connection task and stops retrying.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_test::assert_ok;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use trackpad_client::infrastructure::{ChannelConfig, ChannelState, ReconnectingChannel};
use trackpad_core::{decode_event, MouseButton, SemanticEvent};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A WebSocket host that records connections and received events.
///
/// With `drop_after` set, the host closes each connection after that many
/// messages, which simulates a network drop.
struct TestHost {
    addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
    max_live: Arc<AtomicUsize>,
    events: mpsc::UnboundedReceiver<SemanticEvent>,
}

async fn start_host(drop_after: Option<usize>) -> TestHost {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let accepted = Arc::new(AtomicUsize::new(0));
    let live = Arc::new(AtomicUsize::new(0));
    let max_live = Arc::new(AtomicUsize::new(0));
    let (tx, events) = mpsc::unbounded_channel();

    let (accepted_c, live_c, max_c) = (
        Arc::clone(&accepted),
        Arc::clone(&live),
        Arc::clone(&max_live),
    );
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let Ok(mut ws) = accept_async(stream).await else {
                continue;
            };
            accepted_c.fetch_add(1, Ordering::SeqCst);
            let now_live = live_c.fetch_add(1, Ordering::SeqCst) + 1;
            max_c.fetch_max(now_live, Ordering::SeqCst);

            let (tx, live_c) = (tx.clone(), Arc::clone(&live_c));
            tokio::spawn(async move {
                let mut received = 0usize;
                while let Some(Ok(message)) = ws.next().await {
                    if let Message::Text(text) = message {
                        if let Ok(event) = decode_event(&text) {
                            let _ = tx.send(event);
                        }
                        received += 1;
                        if drop_after == Some(received) {
                            let _ = ws.close(None).await;
                            break;
                        }
                    }
                }
                live_c.fetch_sub(1, Ordering::SeqCst);
            });
        }
    });

    TestHost {
        addr,
        accepted,
        live,
        max_live,
        events,
    }
}

fn config(addr: SocketAddr, delay_ms: u64) -> ChannelConfig {
    ChannelConfig {
        url: format!("ws://{addr}/ws"),
        reconnect_delay: Duration::from_millis(delay_ms),
        outbound_capacity: 16,
    }
}

async fn wait_for_state(channel: &ReconnectingChannel, wanted: ChannelState) {
    let mut state = channel.subscribe_state();
    tokio::time::timeout(Duration::from_secs(5), state.wait_for(|s| *s == wanted))
        .await
        .expect("timed out waiting for channel state")
        .expect("channel task ended");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_events_arrive_one_message_each() {
    // Arrange
    let mut host = start_host(None).await;
    let channel = ReconnectingChannel::open(config(host.addr, 100)).expect("open");
    assert!(channel.wait_open().await);

    // Act
    assert_ok!(channel.send(&SemanticEvent::Move { dx: 3.5, dy: -7.0 }));
    assert_ok!(channel.send(&SemanticEvent::Click {
        button: MouseButton::Left,
    }));

    // Assert
    let first = host.events.recv().await.expect("first event");
    let second = host.events.recv().await.expect("second event");
    assert_eq!(first, SemanticEvent::Move { dx: 3.5, dy: -7.0 });
    assert_eq!(
        second,
        SemanticEvent::Click {
            button: MouseButton::Left
        }
    );
    channel.close().await;
}

/// The host drops every connection after one message.  The channel comes
/// back each time, one connection at a time.
#[tokio::test]
async fn test_reconnects_after_host_drops_connection() {
    // Arrange
    let mut host = start_host(Some(1)).await;
    let channel = ReconnectingChannel::open(config(host.addr, 50)).expect("open");

    // Act
    for round in 0..3 {
        wait_for_state(&channel, ChannelState::Open).await;
        channel
            .send(&SemanticEvent::NextWindow)
            .unwrap_or_else(|e| panic!("send in round {round}: {e}"));
        host.events.recv().await.expect("event");
        // The host closes after this message; wait until the client notices.
        wait_for_state(&channel, ChannelState::Reconnecting).await;
    }
    wait_for_state(&channel, ChannelState::Open).await;

    // Assert
    assert!(host.accepted.load(Ordering::SeqCst) >= 4);
    assert_eq!(host.max_live.load(Ordering::SeqCst), 1);
    assert!(channel.attempts() >= 4);
    channel.close().await;
}

/// With nothing listening, attempts repeat at the fixed delay.
#[tokio::test]
async fn test_retries_at_fixed_delay_without_host() {
    // Arrange: grab a free port, then release it.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        listener.local_addr().expect("addr")
    };
    let channel = ReconnectingChannel::open(config(addr, 100)).expect("open");

    // Act
    tokio::time::sleep(Duration::from_millis(450)).await;
    let attempts = channel.attempts();

    // Assert: one immediate attempt plus roughly one per 100 ms.
    assert!((3..=6).contains(&attempts), "attempts = {attempts}");
    assert_ne!(channel.state(), ChannelState::Open);
    channel.close().await;
}

#[tokio::test]
async fn test_close_stops_retrying() {
    // Arrange
    let host = start_host(None).await;
    let channel = ReconnectingChannel::open(config(host.addr, 50)).expect("open");
    assert!(channel.wait_open().await);
    let mut state = channel.subscribe_state();

    // Act
    channel.close().await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Assert
    assert_eq!(*state.borrow_and_update(), ChannelState::Closed);
    assert_eq!(host.accepted.load(Ordering::SeqCst), 1);
    assert_eq!(host.live.load(Ordering::SeqCst), 0);
}
