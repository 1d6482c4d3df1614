mod category_handlers;
mod category_models;
mod category_service;
mod config;
mod doc;
mod error;
mod packet_handlers;
mod packet_models;
mod packet_service;
mod pagination;
mod routes;
mod storage;
mod user_handlers;
mod user_models;
mod user_service;
mod validation;

#[cfg(test)]
mod api_tests;

use anyhow::{Context, Result};
use clap::Parser;
use config::ServerConfig;
use routes::AppState;
use std::sync::Arc;
use storage::Database;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    let db = match &config.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "loading collections from disk");
            Database::open(dir)?
        }
        None => {
            tracing::warn!("no data directory configured, records will not outlive the process");
            Database::in_memory()
        }
    };

    let state = Arc::new(AppState::new(Arc::new(db)));
    let app = routes::router(state).layer(config.cors_layer()?);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    tracing::info!("🚀 Packet service running on http://{}", address);
    tracing::info!("📋 API docs at http://{}/api-docs", address);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
