//! Remote trackpad client entry point.
//!
//! Replays a JSON-lines touch feed through the gesture recognizer and
//! streams the resulting events to a trackpad host.
//!
//! ```text
//! main()
//!  ├─ ReconnectingChannel::open()   -- background connect/retry task
//!  ├─ spawn_feed_reader()           -- file or stdin → touch samples
//!  └─ ClientLoop::run()             -- recognizer → pacer → channel
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use trackpad_client::application::{ClientLoop, SendPacer};
use trackpad_client::infrastructure::channel::DEFAULT_URL;
use trackpad_client::infrastructure::{spawn_feed_reader, ChannelConfig, ReconnectingChannel, Replay};
use trackpad_core::{GestureConfig, GestureRecognizer};

/// Samples buffered between the feed reader and the client loop.
const FEED_CAPACITY: usize = 64;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote trackpad client.
#[derive(Debug, Parser)]
#[command(
    name = "trackpad-client",
    about = "Stream gestures recognized from a touch feed to a trackpad host",
    version
)]
struct Cli {
    /// WebSocket URL of the host.
    #[arg(long, default_value = DEFAULT_URL, env = "TRACKPAD_URL")]
    url: String,

    /// JSON-lines touch feed; `-` reads stdin.
    #[arg(long, default_value = "-")]
    input: String,

    /// Minimum gap between two sent events, in milliseconds.
    #[arg(long, default_value_t = 10)]
    send_interval_ms: u64,

    /// Wait before reconnecting after a failed or dropped connection.
    #[arg(long, default_value_t = 1000)]
    reconnect_delay_ms: u64,

    /// Pointer pixels per touch pixel for one-finger moves.
    #[arg(long)]
    move_sensitivity: Option<f64>,

    /// Scroll units per touch pixel for two-finger scrolls.
    #[arg(long)]
    scroll_sensitivity: Option<f64>,

    /// Release samples as fast as they are read instead of at their timestamps.
    #[arg(long)]
    immediate: bool,
}

impl Cli {
    fn gesture_config(&self) -> GestureConfig {
        let defaults = GestureConfig::default();
        GestureConfig {
            move_sensitivity: self.move_sensitivity.unwrap_or(defaults.move_sensitivity),
            scroll_sensitivity: self
                .scroll_sensitivity
                .unwrap_or(defaults.scroll_sensitivity),
            ..defaults
        }
    }

    fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            url: self.url.clone(),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            ..ChannelConfig::default()
        }
    }

    fn replay(&self) -> Replay {
        if self.immediate {
            Replay::Immediate
        } else {
            Replay::Realtime
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let recognizer =
        GestureRecognizer::new(cli.gesture_config()).context("invalid gesture settings")?;
    let channel = ReconnectingChannel::open(cli.channel_config())?;

    info!("connecting to {}", cli.url);
    tokio::select! {
        opened = channel.wait_open() => {
            if !opened {
                anyhow::bail!("channel closed before it opened");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C before connecting");
            channel.close().await;
            return Ok(());
        }
    }

    let reader = open_input(&cli.input).await?;
    let (samples, feed_task) = spawn_feed_reader(reader, cli.replay(), FEED_CAPACITY);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    let client = ClientLoop::new(
        recognizer,
        SendPacer::new(Duration::from_millis(cli.send_interval_ms)),
    );
    let stats = client.run(samples, &channel, shutdown_rx).await;

    feed_task.abort();
    channel.close().await;
    info!(
        samples = stats.samples,
        sent = stats.pacer.sent,
        "remote trackpad client stopped"
    );
    Ok(())
}

async fn open_input(input: &str) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if input == "-" {
        if std::io::stdin().is_terminal() {
            warn!("reading touch samples from the terminal; pipe a feed or pass --input");
        }
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let path = PathBuf::from(input);
    let file = tokio::fs::File::open(&path)
        .await
        .with_context(|| format!("failed to open touch feed {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        // Arrange / Act
        let cli = Cli::parse_from(["trackpad-client"]);

        // Assert
        assert_eq!(cli.url, "ws://127.0.0.1:5000/ws");
        assert_eq!(cli.input, "-");
        assert_eq!(cli.send_interval_ms, 10);
        assert_eq!(cli.reconnect_delay_ms, 1000);
        assert_eq!(cli.replay(), Replay::Realtime);
    }

    #[test]
    fn test_sensitivity_overrides_keep_other_defaults() {
        let cli = Cli::parse_from([
            "trackpad-client",
            "--move-sensitivity",
            "2.0",
            "--scroll-sensitivity",
            "0.5",
        ]);

        let config = cli.gesture_config();

        assert_eq!(config.move_sensitivity, 2.0);
        assert_eq!(config.scroll_sensitivity, 0.5);
        assert_eq!(config.tap_threshold_ms, GestureConfig::default().tap_threshold_ms);
    }

    #[test]
    fn test_channel_config_uses_reconnect_delay() {
        let cli = Cli::parse_from([
            "trackpad-client",
            "--url",
            "ws://10.0.0.2:5000/ws",
            "--reconnect-delay-ms",
            "250",
        ]);

        let config = cli.channel_config();

        assert_eq!(config.url, "ws://10.0.0.2:5000/ws");
        assert_eq!(config.reconnect_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_negative_sensitivity_is_rejected() {
        let cli = Cli::parse_from(["trackpad-client", "--move-sensitivity=-1"]);
        assert!(GestureRecognizer::new(cli.gesture_config()).is_err());
    }
}
