//! Gaming blog server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ middleware ──▶ routes ──▶ db ──▶ SQLite
//!                      (layers)      (observers)   (handlers)  (pool)
//!
//!     Cross-cutting
//!       config         file + BLOG_* env overrides
//!       observability  LogService (rotating JSON files), tracing, metrics
//!       resilience     per-call deadlines
//!       lifecycle      graceful shutdown, log drain
//! ```

use std::path::PathBuf;

use clap::Parser;

use blog_server::config::load_config;
use blog_server::db::Database;
use blog_server::lifecycle::{self, Shutdown};
use blog_server::observability::{self, LogService};
use blog_server::HttpServer;

#[derive(Parser)]
#[command(name = "blog-server")]
#[command(about = "Gaming blog HTTP server", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    observability::tracing::init_tracing(&config.observability.tracing_filter);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        "blog-server starting"
    );

    let log = LogService::open(&config.logging, config.environment)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let db = match Database::connect(&config.database, log.clone()).await {
        Ok(db) => db,
        Err(e) => {
            log.shutdown().await;
            return Err(e.into());
        }
    };
    if let Err(e) = db.migrate().await {
        lifecycle::release(&db, &log).await;
        return Err(e.into());
    }

    let listener = lifecycle::bind_listener(&config.listener.bind_address, &db, &log).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, db.clone(), log.clone());
    let served = server.run(listener, shutdown.subscribe()).await;

    lifecycle::release(&db, &log).await;
    served?;

    tracing::info!("Shutdown complete");
    Ok(())
}
