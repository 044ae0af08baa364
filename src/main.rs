//! Posts API gateway binary.
//!
//! Startup order: config first (the log level lives there), then logging,
//! then metrics, then the listener — traffic is only accepted once every
//! subsystem is ready.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use post_gateway::config::{load_config, GatewayConfig};
use post_gateway::observability::{logging, metrics};
use post_gateway::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "post-gateway", about = "HTTP gateway for the posts document store")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        store_base_url = %config.store.base_url,
        namespace = %config.store.namespace,
        gated_routes = ?config.auth.require_auth_for,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
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
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
