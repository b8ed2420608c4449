//! HTTP API server for the TNS mirror.

pub mod api_error;
mod handlers;
mod pages;
mod query_types;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use tns_mirror_ingest::{IngestError, RefreshPipeline};
use tns_mirror_storage::PgCatalog;

pub use api_error::ApiError;

/// Shared application state for all HTTP handlers.
///
/// The store is cheap to clone (pool handle); the pipeline is optional
/// because a query-only deployment has no TNS bot credentials.
pub struct AppState {
    pub catalog: PgCatalog,
    pub pipeline: Option<Arc<RefreshPipeline>>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/api/v1/help", get(pages::help))
        .route("/health", get(health))
        .route("/api/readiness", get(readiness))
        .route("/api/v1/all", get(handlers::catalog::all))
        .route("/api/v1/circle", get(handlers::catalog::circle))
        .route("/api/v1/object", get(handlers::catalog::object))
        .route("/api/v1/refresh", post(handlers::admin::refresh))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Spawns the background task that refreshes the catalog periodically.
///
/// Errors are logged but do not stop the loop — the next interval tries
/// again. An `AlreadyRunning` rejection (e.g. an operator-triggered
/// refresh in flight) is expected and logged at debug.
pub fn start_refresh_scheduler(pipeline: Arc<RefreshPipeline>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match pipeline.refresh().await {
                Ok(result) => {
                    tracing::info!(
                        rows = result.rows_loaded,
                        duration_secs = result.duration_secs,
                        "scheduled refresh completed"
                    );
                },
                Err(IngestError::AlreadyRunning) => {
                    tracing::debug!("scheduled refresh skipped, one already running");
                },
                Err(e) => {
                    tracing::warn!("scheduled refresh failed: {e}");
                },
            }
        }
    });
}

async fn health() -> &'static str {
    "ok"
}

/// Readiness probe: succeeds once the store answers a trivial query.
/// Deployment bring-up polls this until the database is reachable.
async fn readiness(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.catalog.ping().await {
        Ok(()) => Ok(Json(serde_json::json!({"status": "ready"}))),
        Err(e) => {
            tracing::debug!("readiness probe failed: {e}");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({"status": "unavailable"})),
            ))
        },
    }
}
