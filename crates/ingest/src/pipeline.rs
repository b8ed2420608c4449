//! The refresh pipeline itself.

use std::time::Instant;

use serde::Serialize;
use tns_mirror_storage::PgCatalog;

use crate::error::IngestError;
use crate::feed::FeedClient;
use crate::parse::decode_feed;

/// Outcome of a successful refresh.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RefreshResult {
    pub rows_loaded: u64,
    pub duration_secs: f64,
}

/// Downloads the upstream feed and atomically replaces the catalog.
///
/// At-most-one refresh runs at a time: a trigger while one is in flight
/// is rejected with [`IngestError::AlreadyRunning`] rather than queued,
/// so a slow upstream cannot pile up replace transactions.
pub struct RefreshPipeline {
    feed: FeedClient,
    catalog: PgCatalog,
    in_flight: tokio::sync::Mutex<()>,
}

impl RefreshPipeline {
    pub fn new(feed: FeedClient, catalog: PgCatalog) -> Self {
        Self { feed, catalog, in_flight: tokio::sync::Mutex::new(()) }
    }

    /// Run one full refresh: download, decode, replace.
    ///
    /// Idempotent — the same upstream feed yields an identical catalog.
    /// On any error the previously served catalog stays untouched.
    pub async fn refresh(&self) -> Result<RefreshResult, IngestError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Err(IngestError::AlreadyRunning);
        };
        let started = Instant::now();

        tracing::info!("refresh: downloading upstream feed");
        let payload = self.feed.download().await?;

        tracing::info!(bytes = payload.len(), "refresh: decoding feed payload");
        // CPU-bound zip + CSV work; keep it off the async workers.
        let records = tokio::task::spawn_blocking(move || decode_feed(&payload))
            .await
            .map_err(|e| IngestError::Decode(format!("decode task panicked: {e}")))??;

        tracing::info!(rows = records.len(), "refresh: replacing catalog");
        let rows_loaded = self.catalog.replace_catalog(&records).await?;

        let result = RefreshResult { rows_loaded, duration_secs: started.elapsed().as_secs_f64() };
        tracing::info!(
            rows = result.rows_loaded,
            duration_secs = result.duration_secs,
            "refresh: completed"
        );
        Ok(result)
    }
}
