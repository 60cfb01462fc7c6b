//! Round-robin HTTP load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 LOAD BALANCER                 │
//!     Client Request     │  ┌─────────┐    ┌──────────────┐              │
//!     ───────────────────┼─▶│  http   │───▶│ load_balancer│              │
//!                        │  │ server  │    │ round robin  │              │
//!                        │  └─────────┘    └──────┬───────┘              │
//!                        │                        ▼                      │
//!     Client Response    │  ┌─────────┐    ┌──────────────┐              │
//!     ◀──────────────────┼──│envelope │◀───│   forward    │◀─────────────┼── Backend
//!                        │  │ unwrap  │    │  (1 attempt) │              │
//!                        │  └─────────┘    └──────────────┘              │
//!                        │                                               │
//!                        │  ┌─────────────────────────────────────────┐  │
//!                        │  │ health: one probe task per server       │  │
//!                        │  │ config · observability · lifecycle      │  │
//!                        │  └─────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rr_proxy::config::load_config;
use rr_proxy::http::HttpServer;
use rr_proxy::lifecycle::{signals, Shutdown};
use rr_proxy::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "RR_PROXY_CONFIG", default_value = "config/config.toml")]
    config: PathBuf,

    /// Override the listener port.
    #[arg(short, long, env = "RR_PROXY_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Invalid configuration is fatal before anything is served.
    let mut config = load_config(&cli.config)?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rr-proxy starting");

    if let Some(port) = cli.port {
        let mut addr: SocketAddr = config.listener.bind_address.parse()?;
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }

    tracing::info!(
        config_path = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        health_check_interval = ?config.health_check.interval,
        latency_threshold = ?config.health_check.effective_latency_threshold(),
        backend_timeout = ?config.timeouts.backend_request,
        "Configuration loaded"
    );
    for server in &config.servers {
        tracing::info!(address = %server, "Backend configured");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
