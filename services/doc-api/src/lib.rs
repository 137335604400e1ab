//! DOC chart service library.
//!
//! Exposes the request/response invocation, the HTTP router, and the
//! direct-call CLI so both binaries and the tests share one code path.

pub mod cli;
pub mod config;
pub mod handlers;
pub mod invocation;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub use invocation::{invoke, ChartRequest, ChartResponse, ChartService};
pub use state::AppState;

/// Build the HTTP router.
pub fn create_app(state: Arc<AppState>, prometheus: PrometheusHandle) -> Router {
    Router::new()
        .route("/invoke", post(handlers::invoke_handler))
        .route("/chart.png", post(handlers::chart_png_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(Extension(prometheus))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
