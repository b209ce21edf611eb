//! cafe-api - Cafe review and orphan-file reconciliation service
//!
//! Default port 5740. Configuration: command line > CAFE_* environment >
//! TOML file > compiled defaults.

use anyhow::Result;
use cafe_common::config::{ConfigOverrides, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cafe_api::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "cafe-api", version, about = "Cafe review platform service")]
struct Args {
    /// TOML config file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let overrides = ConfigOverrides {
        config_file: args.config,
        database_path: args.database,
        host: args.host,
        port: args.port,
    };
    let config = ServiceConfig::resolve(&overrides)?;

    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting cafe-api v{} (log level {})",
        env!("CARGO_PKG_VERSION"),
        config.log_level
    );
    info!("Database path: {}", config.database_path.display());

    let pool = match cafe_common::db::init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, config.max_lock_wait_ms);
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("cafe-api listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
