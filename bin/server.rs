// Euro Denomination Calculator - Web Server
// REST API with Axum: POST /api/calculate, GET /api/health

use anyhow::{Context, Result};
use euro_denomination::api::router;
use euro_denomination::config::ServerConfig;
use euro_denomination::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();
    init_tracing(config.log_format, "info");

    tracing::info!(version = euro_denomination::VERSION, "starting denomination server");
    if config.cors_origins.is_empty() {
        tracing::info!("CORS: any origin allowed");
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: restricted origins");
    }

    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen_addr))?;

    tracing::info!("Listening on http://{}", config.listen_addr);
    tracing::info!("API: http://{}/api/calculate", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
