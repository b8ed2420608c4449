//! Typed error enum for the refresh pipeline.

use thiserror::Error;
use tns_mirror_storage::StorageError;

/// Refresh-pipeline error. Every variant aborts the run before the live
/// catalog is touched, except `Storage`, whose transaction rolls back.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Upstream fetch failed after retries, or returned a non-success status.
    #[error("feed download failed: {0}")]
    Download(String),

    /// Payload did not decompress or did not parse as CSV.
    #[error("feed payload could not be decoded: {0}")]
    Decode(String),

    /// Feed header is missing a column this mirror depends on.
    #[error("feed schema missing required column {0:?}")]
    Schema(&'static str),

    /// A refresh is already in flight; concurrent triggers are rejected,
    /// not queued.
    #[error("a catalog refresh is already running")]
    AlreadyRunning,

    /// Replacing step failed; the transaction rolled back.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Download(err.to_string())
    }
}
