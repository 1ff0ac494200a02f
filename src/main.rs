//! Contacts REST API
//!
//! Serves the `contacts` resource over HTTP, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────────┐
//!                         │                    CONTACTS API                       │
//!                         │                                                       │
//!     Client Request      │  ┌─────────┐    ┌──────────┐    ┌──────────────┐      │
//!     ────────────────────┼─▶│  http   │───▶│ routing  │───▶│   routing    │      │
//!                         │  │ server  │    │ matcher  │    │   dispatch   │      │
//!                         │  └─────────┘    └──────────┘    └──────┬───────┘      │
//!                         │                                        │              │
//!                         │                                        ▼              │
//!     Client Response     │  ┌──────────┐                   ┌──────────────┐      │
//!     ◀───────────────────┼──│ response │◀──────────────────│ContactStore  │      │
//!                         │  │ envelope │                   │ (in-memory)  │      │
//!                         │  └──────────┘                   └──────────────┘      │
//!                         │                                                       │
//!                         │  ┌─────────────────────────────────────────────────┐  │
//!                         │  │ config · observability · lifecycle · error      │  │
//!                         │  └─────────────────────────────────────────────────┘  │
//!                         └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use contacts_api::config::{load_config, ApiConfig};
use contacts_api::observability::{logging, metrics};
use contacts_api::{HttpServer, InMemoryContactStore, Shutdown};

#[derive(Parser)]
#[command(name = "contacts-api")]
#[command(about = "REST API for the contacts resource", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ApiConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("contacts-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.security.max_body_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let store = match &config.store.snapshot_path {
        Some(path) => InMemoryContactStore::load_from_file(path)?,
        None => InMemoryContactStore::default(),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(store.clone()));
    server.run(listener, shutdown.subscribe()).await?;

    if let Err(e) = store.save_to_file() {
        tracing::error!(error = %e, "Failed to save contacts snapshot");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
