//! Weightboard Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Config file (see `config::generate_default_config`) with environment
//! overrides; CLI flags win over both:
//! - `--host` / `WEIGHTBOARD_HOST`: Host to bind to (default: 0.0.0.0)
//! - `--port` / `WEIGHTBOARD_PORT`: Port to listen on (default: 8050)
//! - `--debug`: Verbose request logging
//! - `WEIGHTBOARD_DB_*`: Measurement store connection parameters
//! - `RUST_LOG`: Log filter override

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weightboard::api::{serve, AppState};
use weightboard::config::Config;
use weightboard::store::MySqlStore;

#[derive(Parser)]
#[command(name = "weightboard")]
#[command(about = "Live dashboard for daily average weight measurements", long_about = None)]
struct Cli {
    /// Host to bind the dashboard server to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Path to a config file (otherwise default locations are searched)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    if cli.debug {
        config.api.debug = true;
        config.logging.level = "debug".to_string();
    }

    init_tracing(&config);

    tracing::info!("Starting Weightboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        host = %config.database.host,
        database = %config.database.database,
        "Connecting to measurement store"
    );

    let store = Arc::new(MySqlStore::connect(&config.database).await?);

    let state = AppState::new(store, config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("Weightboard stopped");
    Ok(())
}

/// Initialize tracing from the logging config; RUST_LOG wins when set
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "weightboard={},tower_http={}",
            config.logging.level,
            if config.api.debug { "debug" } else { "warn" }
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
