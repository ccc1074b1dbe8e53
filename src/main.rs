use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shop_api::auth::JwtAuth;
use shop_api::config;
use shop_api::database::{PgExecutor, QueryCatalog};
use shop_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    info!("Starting Shop API in {:?} mode", config.environment);

    let catalog = QueryCatalog::load(config.database.query_catalog_path.as_deref())
        .context("failed to load query catalog")?;
    let executor = Arc::new(PgExecutor::connect(&config.database, catalog).context("failed to configure database")?);
    let jwt = JwtAuth::from_config(&config.security).context("JWT_SECRET must be set")?;

    let state = AppState::new(executor.clone(), jwt);
    let router = app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Shop API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    executor.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
