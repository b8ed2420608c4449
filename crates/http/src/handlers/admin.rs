//! Refresh trigger, called by the deployment's scheduler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tns_mirror_ingest::RefreshResult;

use crate::api_error::ApiError;
use crate::AppState;

/// `POST /api/v1/refresh` — run one catalog refresh.
///
/// 409 when a refresh is already in flight, 503 when the server was
/// started without TNS bot credentials.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResult>, ApiError> {
    let pipeline = state.pipeline.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable(
            "refresh not configured (TNS bot credentials not set)".to_owned(),
        )
    })?;
    Ok(Json(pipeline.refresh().await?))
}
