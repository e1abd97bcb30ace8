//! moltforge-api server entry point.
//!
//! Loads configuration, opens the configured store, and serves the REST API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use moltforge_api::api;
use moltforge_api::app_state::AppState;
use moltforge_api::config::{LogFormat, ServiceConfig, StoreBackend};
use moltforge_api::persistence::{BotStore, MemoryStore, PostgresStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServiceConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        backend = ?config.store_backend,
        strict_status = config.strict_status,
        "starting moltforge-api"
    );

    // Build persistence layer
    let store: Arc<dyn BotStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let store = PostgresStore::connect(&config)
                .await
                .context("failed to connect to PostgreSQL")?;
            if config.database_run_migrations {
                store.migrate().await.context("failed to run migrations")?;
            }
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Build application
    let app_state = AppState::new(store, &config);
    let app = api::build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
