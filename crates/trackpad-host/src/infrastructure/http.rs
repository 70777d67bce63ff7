//! Minimal HTTP handling for the single listener.
//!
//! The listener serves two things on one port: the touch page and the
//! WebSocket endpoint.  Each connection's request head is peeked (not
//! consumed), classified into a [`Route`], and then either handed to the
//! WebSocket handshake untouched or answered with a plain response.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Largest request head the listener will look at.
pub const MAX_HEAD_BYTES: usize = 4096;

/// Path of the WebSocket endpoint.
pub const WS_PATH: &str = "/ws";

const PEEK_ATTEMPTS: usize = 50;
const PEEK_RETRY_DELAY: Duration = Duration::from_millis(10);

/// What to do with an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /` or `GET /index.html`.
    Page,
    /// `GET /ws` with `Upgrade: websocket`.
    WebSocket,
    /// `GET /ws` without the upgrade header.
    UpgradeRequired,
    NotFound,
    MethodNotAllowed,
    Malformed,
}

/// Returns `true` once `buf` holds a complete request head.
pub fn head_complete(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n")
}

/// Classifies a request from its head bytes.
pub fn classify_request_head(head: &[u8]) -> Route {
    let Ok(text) = std::str::from_utf8(head) else {
        return Route::Malformed;
    };
    let mut lines = text.split("\r\n");
    let Some(request_line) = lines.next() else {
        return Route::Malformed;
    };

    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Route::Malformed;
    };
    if !version.starts_with("HTTP/") {
        return Route::Malformed;
    }
    if method != "GET" {
        return Route::MethodNotAllowed;
    }

    let path = target.split(['?', '#']).next().unwrap_or(target);
    match path {
        "/" | "/index.html" => Route::Page,
        WS_PATH => {
            let upgrade = lines
                .take_while(|line| !line.is_empty())
                .filter_map(|line| line.split_once(':'))
                .any(|(name, value)| {
                    name.trim().eq_ignore_ascii_case("upgrade")
                        && value.trim().eq_ignore_ascii_case("websocket")
                });
            if upgrade {
                Route::WebSocket
            } else {
                Route::UpgradeRequired
            }
        }
        _ => Route::NotFound,
    }
}

/// Peeks at the request head without consuming it.
///
/// Returns the number of bytes available in `buf`.  Stops early once the
/// head is complete, the buffer is full, or the peer closed.
pub async fn peek_request_head(stream: &TcpStream, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut seen = 0;
    for _ in 0..PEEK_ATTEMPTS {
        let n = stream.peek(buf).await?;
        if n == 0 || n == buf.len() || head_complete(&buf[..n]) {
            return Ok(n);
        }
        if n == seen {
            tokio::time::sleep(PEEK_RETRY_DELAY).await;
        }
        seen = n;
    }
    Ok(seen)
}

/// Consumes `len` already-peeked bytes, then writes a complete response and
/// closes the write side.
pub async fn respond(
    stream: &mut TcpStream,
    consumed: usize,
    status: u16,
    content_type: &str,
    body: &str,
) -> std::io::Result<()> {
    let mut discard = vec![0u8; consumed];
    stream.read_exact(&mut discard).await?;

    let mut response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {len}\r\nCache-Control: no-store\r\nConnection: close\r\n",
        reason = reason_phrase(status),
        len = body.len(),
    );
    if status == 426 {
        response.push_str("Upgrade: websocket\r\n");
    }
    response.push_str("\r\n");
    response.push_str(body);

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        426 => "Upgrade Required",
        _ => "",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const UPGRADE_HEAD: &[u8] = b"GET /ws HTTP/1.1\r\nHost: 192.168.1.5:5000\r\nConnection: Upgrade\r\nUpgrade: websocket\r\nSec-WebSocket-Version: 13\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n";

    #[test]
    fn test_root_is_page() {
        assert_eq!(
            classify_request_head(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"),
            Route::Page
        );
    }

    #[test]
    fn test_index_html_with_query_is_page() {
        assert_eq!(
            classify_request_head(b"GET /index.html?v=2 HTTP/1.1\r\n\r\n"),
            Route::Page
        );
    }

    #[test]
    fn test_ws_with_upgrade_header_is_websocket() {
        assert_eq!(classify_request_head(UPGRADE_HEAD), Route::WebSocket);
    }

    #[test]
    fn test_upgrade_header_is_case_insensitive() {
        let head = b"GET /ws HTTP/1.1\r\nupgrade: WebSocket\r\n\r\n";
        assert_eq!(classify_request_head(head), Route::WebSocket);
    }

    #[test]
    fn test_ws_without_upgrade_requires_upgrade() {
        assert_eq!(
            classify_request_head(b"GET /ws HTTP/1.1\r\nHost: x\r\n\r\n"),
            Route::UpgradeRequired
        );
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(
            classify_request_head(b"GET /favicon.ico HTTP/1.1\r\n\r\n"),
            Route::NotFound
        );
    }

    #[test]
    fn test_post_is_method_not_allowed() {
        assert_eq!(
            classify_request_head(b"POST / HTTP/1.1\r\n\r\n"),
            Route::MethodNotAllowed
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert_eq!(classify_request_head(b"\x16\x03\x01\x02"), Route::Malformed);
        assert_eq!(classify_request_head(b"GET /\r\n\r\n"), Route::Malformed);
    }

    #[test]
    fn test_head_complete_needs_blank_line() {
        assert!(!head_complete(b"GET / HTTP/1.1\r\nHost: x\r\n"));
        assert!(head_complete(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"));
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(reason_phrase(404), "Not Found");
        assert_eq!(reason_phrase(426), "Upgrade Required");
    }
}
