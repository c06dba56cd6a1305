//! Content Router
//!
//! Authenticated content proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                   CONTENT ROUTER                      │
//!                      │                                                       │
//!  GET /{route}        │  ┌─────────┐   ┌──────────┐   ┌───────────────┐      │
//!  ────────────────────┼─▶│  http   │──▶│ routing  │──▶│     auth      │◀─────┼──▶ Identity
//!                      │  │ server  │   │ rewrite  │   │ cookie/token  │      │    Provider
//!                      │  └─────────┘   └──────────┘   └───────┬───────┘      │
//!                      │       ▲                               │              │
//!                      │       │        redirect / error       │ ok           │
//!                      │       │◀──────────────────────────────┤              │
//!                      │       │                               ▼              │
//!  Response            │       │                        ┌─────────────┐       │
//!  ◀───────────────────┼───────┴────────────────────────│   content   │◀──────┼──▶ Object
//!                      │                                │   server    │       │    Store
//!                      │                                └─────────────┘       │
//!                      │  ┌────────────────────────────────────────────────┐  │
//!                      │  │ config · observability · lifecycle             │  │
//!                      │  └────────────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;

use content_router::auth::FirebaseAuth;
use content_router::config::{load_config, ObservabilityConfig, RouterConfig};
use content_router::content::open_bucket;
use content_router::lifecycle::{forward_signals, Shutdown};
use content_router::observability::{logging, metrics};
use content_router::HttpServer;

#[derive(Parser)]
#[command(name = "content-router")]
#[command(about = "Authenticated content proxy for a Cloud Storage bucket", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables take precedence.
    #[arg(short, long, env = "CONTENT_ROUTER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability);

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Content router failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bucket = %config.storage.bucket,
        firebase_path = %config.storage.firebase_path,
        gcs_path = %config.storage.gcs_path,
        redirect_path = %config.auth.redirect_path,
        content_type_source = ?config.content.content_type_source,
        cache_control = ?config.content.cache_control,
        "Configuration loaded"
    );

    let store = open_bucket(&config.storage)?;
    let provider = Arc::new(FirebaseAuth::new(&config.auth)?);

    if let Some(addr) = &config.observability.metrics_address {
        match addr.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(metrics_address = %addr, "Failed to parse metrics address"),
        }
    }

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(forward_signals(shutdown.clone()));

    let server = HttpServer::new(config, store, provider);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
