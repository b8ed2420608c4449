//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (not found, radius cap,
//! transient DB errors) instead of downcasting opaque boxes.

use thiserror::Error;
use tns_mirror_core::{CoordError, MAX_RADIUS_ARCSEC};

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Zero rows matched a lookup that names a specific entity.
    #[error("not found: {entity} {key:?}")]
    NotFound { entity: &'static str, key: String },

    /// Cone-search radius outside `(0, MAX_RADIUS_ARCSEC]`.
    #[error("radius {radius_arcsec} arcsec out of range (0, {MAX_RADIUS_ARCSEC}]")]
    RadiusOutOfRange { radius_arcsec: f64 },

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Row data could not be decoded into a catalog record.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Bootstrap migration failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    /// Whether this error is likely transient (worth surfacing as a
    /// retryable server error rather than a hard failure).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)))
    }
}

/// Custom `From<sqlx::Error>` — NOT blanket `#[from]`.
///
/// `RowNotFound` → `NotFound` (generic; lookup sites remap with entity
/// context), everything else → `Database`.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                Self::NotFound { entity: "row", key: "unknown".to_owned() }
            },
            _ => Self::Database(err),
        }
    }
}

impl From<CoordError> for StorageError {
    fn from(err: CoordError) -> Self {
        Self::DataCorruption {
            context: "stored spoint literal failed to decode".to_owned(),
            source: Box::new(err),
        }
    }
}
