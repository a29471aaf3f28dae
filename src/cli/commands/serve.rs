use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(listen: &str, config: AppConfig) -> anyhow::Result<()> {
    info!("Starting channel API in {:?} mode", config.environment);

    let store = DatabaseManager::connect(&config.database)
        .await
        .context("Couldn't connect to database")?;
    let router = app(AppState::new(store, config));

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {}", listen))?;
    info!("Channel API listening on http://{}", listen);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Channel API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
