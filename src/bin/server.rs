//! Availability engine HTTP server.
//!
//! Loads `slotgrid.toml` (or defaults), initializes the repository, seeds
//! the configured listings, and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin slotgrid-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: bind host, overrides the config file (default: 0.0.0.0)
//! - `PORT`: bind port, overrides the config file (default: 8080)
//! - `REPOSITORY_TYPE`: backend selection, overrides the config file
//! - `RUST_LOG`: log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use slotgrid::db::{self, ListingDirectory};
use slotgrid::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting slotgrid HTTP server");

    let config = db::RepositoryConfig::from_default_location()?;

    db::init_repository(&config)?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!("Repository initialized");

    for seed in &config.listings {
        repository.upsert_listing(seed.to_record()).await?;
    }
    if !config.listings.is_empty() {
        info!("Seeded {} listing(s) from configuration", config.listings.len());
    }

    let app = create_router(AppState::new(repository));

    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
