//! Feed proxy server.
//!
//! Fetches RSS/Atom feeds from an allowlisted set of hosts on behalf of
//! browser clients and relays them with permissive CORS headers.
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 FEED PROXY                    │
//!   GET /api/rss-proxy   │  ┌────────┐   ┌───────────┐   ┌───────────┐  │
//!   ?url=<feed>  ────────┼─▶│  http  │──▶│ forwarder │──▶│ allowlist │  │
//!                        │  │ server │   │           │   └───────────┘  │
//!                        │  └────────┘   │           │   ┌───────────┐  │      feed host
//!   feed + CORS  ◀───────┼───────────────│           │──▶│  fetch +  │──┼────▶ (12s / 20s
//!                        │               └───────────┘   │ deadline  │  │      deadline)
//!                        │                               └───────────┘  │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use feed_proxy::config::{load_config, ProxyConfig};
use feed_proxy::lifecycle::{signals, Shutdown};
use feed_proxy::observability::{logging, metrics};
use feed_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "feed-proxy")]
#[command(about = "CORS-friendly proxy for allowlisted RSS feeds", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("feed-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        path = %config.listener.path,
        feed_timeout_ms = config.timeouts.feed_ms,
        slow_feed_timeout_ms = config.timeouts.slow_feed_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::trigger_on_signal(&signal_shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
