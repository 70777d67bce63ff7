//! Remote trackpad host entry point.
//!
//! Parses the command line, loads the settings file, opens the native input
//! injector, and serves the touch page and WebSocket endpoint until Ctrl+C.
//!
//! # Startup
//!
//! 1. `tracing_subscriber` is initialised; `RUST_LOG` overrides the level.
//! 2. CLI arguments are parsed into a [`Cli`] and converted to a
//!    [`ServerConfig`].
//! 3. The settings file (`--config`) is loaded; a missing file means defaults.
//! 4. The injector is opened: the native backend, or [`DryRunInjector`] with
//!    `--dry-run` or when no backend is available.
//! 5. Ctrl+C clears the shared `running` flag.  On Unix, SIGHUP reloads the
//!    settings file and publishes it to every open session.
//! 6. [`run_server`] accepts connections until the flag is cleared.

use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use trackpad_host::application::{InputInjector, SettingsStore};
use trackpad_host::domain::{HostSettings, ServerConfig, DEFAULT_PORT};
use trackpad_host::infrastructure::input_injection::{native_injector, DryRunInjector};
use trackpad_host::infrastructure::run_server;
use trackpad_host::infrastructure::storage::{load_settings, save_settings};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote trackpad host.
///
/// Open the printed URL on a phone on the same network and use the page as
/// a trackpad for this computer.
#[derive(Debug, Parser)]
#[command(
    name = "trackpad-host",
    about = "Serve a touch trackpad page and replay its gestures as native input",
    version
)]
struct Cli {
    /// IP address to bind the listener to.
    ///
    /// `0.0.0.0` accepts phones on the LAN; `127.0.0.1` accepts only local
    /// connections.
    #[arg(long, default_value = "0.0.0.0", env = "TRACKPAD_BIND")]
    bind: String,

    /// TCP port for the page and the WebSocket endpoint.
    #[arg(long, default_value_t = DEFAULT_PORT, env = "TRACKPAD_PORT")]
    port: u16,

    /// Settings file with optional `[gesture]` and `[dispatch]` tables.
    #[arg(long, env = "TRACKPAD_CONFIG")]
    config: Option<PathBuf>,

    /// Log input instead of injecting it.
    #[arg(long)]
    dry_run: bool,

    /// Write the default settings to `--config` and exit.
    #[arg(long, requires = "config")]
    init_config: bool,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address.
    fn into_server_config(&self) -> anyhow::Result<ServerConfig> {
        let ip: IpAddr = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address: '{}'", self.bind))?;
        Ok(ServerConfig {
            bind_addr: SocketAddr::new(ip, self.port),
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_server_config()?;

    if cli.init_config {
        if let Some(path) = cli.config.as_deref() {
            save_settings(path, &HostSettings::default())
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote default settings to {}", path.display());
        }
        return Ok(());
    }

    let settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    let store = Arc::new(SettingsStore::new(settings));

    let injector: Arc<dyn InputInjector> = if cli.dry_run {
        info!("dry run: input will be logged, not injected");
        Arc::new(DryRunInjector)
    } else {
        match native_injector() {
            Ok(injector) => injector,
            Err(e) => {
                warn!("{e}; falling back to dry run");
                Arc::new(DryRunInjector)
            }
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    #[cfg(unix)]
    if let Some(path) = cli.config.clone() {
        spawn_reload_on_sighup(path, Arc::clone(&store))?;
    }

    let host = if config.bind_addr.ip().is_unspecified() {
        local_ip().unwrap_or(config.bind_addr.ip())
    } else {
        config.bind_addr.ip()
    };
    info!(
        "open http://{} on a device on this network",
        SocketAddr::new(host, config.bind_addr.port())
    );

    run_server(config, store, injector, running).await?;

    info!("remote trackpad host stopped");
    Ok(())
}

/// Reloads the settings file on SIGHUP.
///
/// A file that fails to load or validate is logged and ignored; the running
/// settings stay in effect.
#[cfg(unix)]
fn spawn_reload_on_sighup(path: PathBuf, store: Arc<SettingsStore>) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            match load_settings(Some(&path)) {
                Ok(settings) => match store.update(settings) {
                    Ok(()) => info!("reloaded settings from {}", path.display()),
                    Err(e) => warn!("rejected reloaded settings: {e}"),
                },
                Err(e) => warn!("failed to reload {}: {e}", path.display()),
            }
        }
    });
    Ok(())
}

/// The address this machine uses to reach the LAN.
///
/// Connecting a UDP socket sends nothing; it only selects a route.
fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).ok()?;
    socket.connect(("10.255.255.255", 1)).ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
