use std::future::Future;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use otlite_core::config::Config;
use otlite_core::error::{OtliteError, Result};
use otlite_store::Store;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::pipeline;

#[derive(Clone)]
pub struct HttpIngestState {
    pub store: Store,
    pub ingest_timeout: Duration,
}

pub fn router(store: Store, cfg: &Config) -> Router {
    let state = HttpIngestState {
        store,
        ingest_timeout: cfg.ingest_timeout,
    };
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);
    Router::new()
        .route("/v1/traces", post(export_traces))
        .route("/v1/metrics", post(export_metrics))
        .route("/v1/logs", post(export_logs))
        .layer(DefaultBodyLimit::max(cfg.max_body_bytes))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .on_request(tower_http::trace::DefaultOnRequest::new().level(Level::INFO))
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn export_traces(
    State(state): State<HttpIngestState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = match parse_body(&headers, &body, "traces") {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let result = run_ingest(
        state.ingest_timeout,
        pipeline::ingest_traces(&state.store, &payload),
    )
    .await;
    respond("traces", result)
}

async fn export_metrics(
    State(state): State<HttpIngestState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = match parse_body(&headers, &body, "metrics") {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let result = run_ingest(
        state.ingest_timeout,
        pipeline::ingest_metrics(&state.store, &payload),
    )
    .await;
    respond("metrics", result)
}

async fn export_logs(
    State(state): State<HttpIngestState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = match parse_body(&headers, &body, "logs") {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let result = run_ingest(
        state.ingest_timeout,
        pipeline::ingest_logs(&state.store, &payload),
    )
    .await;
    respond("logs", result)
}

fn parse_body(
    headers: &HeaderMap,
    body: &Bytes,
    signal: &str,
) -> std::result::Result<Value, Response> {
    // Prefix match so charset suffixes are accepted.
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.starts_with("application/json") {
        tracing::warn!(signal, content_type, "unsupported content type");
        return Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "only application/json Content-Type is supported",
        )
            .into_response());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(signal, error = %e, "invalid JSON body");
        (StatusCode::BAD_REQUEST, "invalid JSON body").into_response()
    })
}

/// Ingestion is bounded by the transport timeout. A timed-out transaction is
/// dropped, which rolls it back; nothing partial stays visible.
async fn run_ingest(timeout: Duration, ingest: impl Future<Output = Result<()>>) -> Result<()> {
    match tokio::time::timeout(timeout, ingest).await {
        Ok(result) => result,
        Err(_) => Err(OtliteError::Ingest("ingest timed out".to_string())),
    }
}

fn respond(signal: &str, result: Result<()>) -> Response {
    match result {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "{}",
        )
            .into_response(),
        Err(err @ OtliteError::Schema(_)) => {
            tracing::warn!(signal, error = %err, "payload rejected");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err) => {
            tracing::error!(signal, error = %err, "ingest failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to process {signal} data"),
            )
                .into_response()
        }
    }
}
