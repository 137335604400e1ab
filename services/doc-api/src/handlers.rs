//! HTTP handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::instrument;

use doc_common::{DocError, DocResult};
use renderer::RenderedChart;

use crate::invocation::{error_body, ChartResponse, CONTENT_TYPE_PNG};
use crate::state::AppState;

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Parse and render off the async workers; the render is CPU-bound.
async fn render_blocking(state: Arc<AppState>, body: Bytes) -> DocResult<RenderedChart> {
    tokio::task::spawn_blocking(move || state.service.render_body(&body))
        .await
        .map_err(|e| DocError::RenderingFailure(format!("render task failed: {}", e)))?
}

/// POST /invoke - envelope in the body, HTTP status mirrors `statusCode`
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn invoke_handler(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> Response {
    let envelope = match render_blocking(state, body).await {
        Ok(chart) => ChartResponse::png(&chart.png),
        Err(err) => ChartResponse::error(&err),
    };
    (status(envelope.status_code), Json(envelope)).into_response()
}

/// POST /chart.png - raw PNG, or a JSON error body
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn chart_png_handler(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> Response {
    match render_blocking(state, body).await {
        Ok(chart) => ([(header::CONTENT_TYPE, CONTENT_TYPE_PNG)], chart.png).into_response(),
        Err(err) => (status(err.http_status_code()), Json(error_body(&err))).into_response(),
    }
}

/// GET /health - Basic health check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}
