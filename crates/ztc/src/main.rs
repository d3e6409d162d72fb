//! ZTC server
//!
//! Serves a catalog type registry loaded from a JSON seed file.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use ztc_catalog::{CatalogSeed, CatalogStore};
use ztc_rest::{ServerConfig, create_app_with_config, init_logging};

/// Builds the store from the configured seed file, or an empty one.
fn load_store(config: &ServerConfig) -> anyhow::Result<CatalogStore> {
    let Some(path) = config.seed_file.as_deref() else {
        warn!("No seed file configured, starting with an empty catalog");
        return Ok(CatalogStore::new());
    };

    info!(seed_file = %path.display(), "Loading seed data");
    let seed = CatalogSeed::from_path(path)?;
    seed.into_store()
        .with_context(|| format!("Invalid seed data in {}", path.display()))
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        base_url = %config.base_url,
        api_version = %config.api_version,
        "Starting ZTC server"
    );

    let store = load_store(&config)?;
    let app = create_app_with_config(Arc::new(store), config.clone());
    serve(app, &config).await
}
