use std::time::Duration;

use anyhow::Context;
use gleaner_server::config::ServerConfig;
use gleaner_server::store::{MemoryStore, PostgresStore, Store};
use gleaner_server::{AppState, router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    if config.api_tokens.is_empty() {
        warn!("GLEANER_API_TOKENS is not set; every authenticated route will answer 401");
    }

    let store = match &config.database_url {
        Some(url) => {
            let store = PostgresStore::connect(url)?;
            store.migrate().await?;
            info!("Using Postgres article store");
            Store::Postgres(store)
        }
        None => {
            warn!("DATABASE_URL not set; saved articles are kept in memory only");
            Store::Memory(MemoryStore::new())
        }
    };

    let state = AppState::from_config(&config, store);
    let app = router(state, Duration::from_secs(config.request_timeout));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    info!("Gleaner server listening on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
