use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rag_api_rust::auth::JwtVerifier;
use rag_api_rust::config;
use rag_api_rust::database::DatabaseManager;
use rag_api_rust::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting RAG API in {:?} mode", config.environment);

    let store = DatabaseManager::open_store(config)
        .await
        .context("failed to open storage backend")?;
    let verifier = JwtVerifier::from_config(&config.auth).context("failed to configure JWT verification")?;

    let state = AppState::new(store, Arc::new(verifier))
        .with_settings_owner_check(config.security.settings_owner_check);
    if !config.security.settings_owner_check {
        tracing::warn!("Project settings are readable by project id without an ownership check");
    }

    let app = rag_api_rust::app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("RAG API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
