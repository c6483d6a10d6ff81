use otlite_core::config::Config;
use otlite_core::error::{OtliteError, Result};
use otlite_store::Store;

use crate::otlp::http;

pub async fn run_ingest_server(store: Store, cfg: &Config) -> Result<()> {
    let router = http::router(store, cfg);
    let listener = tokio::net::TcpListener::bind(&cfg.otlp_http_addr)
        .await
        .map_err(|e| OtliteError::Io(format!("failed to bind {}: {e}", cfg.otlp_http_addr)))?;
    let addr = listener
        .local_addr()
        .map_err(|e| OtliteError::Io(format!("listener address unavailable: {e}")))?;
    tracing::info!(%addr, "otlp http receiver listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| OtliteError::Ingest(format!("http server failed: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("received shutdown signal");
}
