//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into proper HTTP responses with JSON body and
//! status codes. Handlers return `Result<Json<T>, ApiError>` instead of
//! losing error context with bare `StatusCode`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tns_mirror_ingest::IngestError;
use tns_mirror_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to a JSON response: `{"error": "message"}`.
/// `Internal` logs the real error server-side and returns a static
/// message to the client — no error detail leakage.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — invalid query parameters.
    BadRequest(String),
    /// 404 Not Found — no catalog record matched.
    NotFound(String),
    /// 409 Conflict — a refresh is already running.
    Conflict(String),
    /// 502 Bad Gateway — the upstream feed failed us.
    UpstreamFailed(String),
    /// 503 Service Unavailable — transient store failure; retryable.
    ServiceUnavailable(String),
    /// 500 Internal Server Error — unexpected failure. Details logged.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::UpstreamFailed(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, key } => {
                Self::NotFound(format!("{entity} {key:?} not found"))
            },
            StorageError::RadiusOutOfRange { .. } => Self::BadRequest(err.to_string()),
            ref e if e.is_transient() => {
                Self::ServiceUnavailable("catalog store temporarily unavailable".to_owned())
            },
            _ => Self::Internal(err.into()),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::AlreadyRunning => Self::Conflict(err.to_string()),
            IngestError::Download(_) | IngestError::Decode(_) | IngestError::Schema(_) => {
                Self::UpstreamFailed(err.to_string())
            },
            IngestError::Storage(e) => e.into(),
        }
    }
}
