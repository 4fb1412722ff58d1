//! Bookstore Server - book inventory, loans and sales
//!
//! A Rust REST API server for a small bookstore.

use std::net::SocketAddr;

use anyhow::Context;

use bookstore_server::{
    api, config::AppConfig, db, logging, repository::Repository, services::Services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = logging::init(&config.logging)?;

    tracing::info!(
        "Starting Bookstore Server v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let pool = db::init(&config.database)
        .await
        .context("Failed to initialize database")?;

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid host address '{}'", config.server.host))?,
        config.server.port,
    );

    let services = Services::new(Repository::new(pool));
    let app = api::router(AppState::new(config, services));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
