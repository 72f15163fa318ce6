use std::net::SocketAddr;

use anyhow::Context;

use crate::{config::AppConfig, routes, state::AppState};

/// Builds the catalog and serves the API until Ctrl-C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&cfg)?;
    tracing::info!(
        meters = state.catalog.len(),
        requests_per_second = state.rate_limiter.limit(),
        max_range_minutes = state.max_range_minutes,
        "meter catalog ready"
    );

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", cfg.server.host, cfg.server.port))?;
    tracing::info!(addr = %listener.local_addr()?, "meter usage API listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("meter usage API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
