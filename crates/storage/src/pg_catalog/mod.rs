//! PostgreSQL catalog backend using sqlx.
//!
//! Split into modular files by concern: read queries and the atomic
//! replace. The spherical codec is invoked deliberately at this layer's
//! edges — `spoint`/`scircle` values cross the wire as text literals and
//! are encoded/decoded here, never hooked into the driver.

mod queries;
mod replace;

use serde_json::{Map, Value};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tns_mirror_core::{
    CatalogRecord, SkyPoint, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};

use crate::error::StorageError;

/// The persisted transient-event catalog.
///
/// Cheap to clone (wraps a `PgPool`). All methods are read-only except
/// [`PgCatalog::replace_catalog`], which is the refresh pipeline's sole
/// entry point into the table structure.
#[derive(Clone, Debug)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Connect, run bootstrap migrations, and hand back the store.
    ///
    /// Bootstrap creates the pg_sphere extension and an *empty* `tns`
    /// table with its name and GiST indexes, so the schema invariant
    /// (spatial index present whenever queries are served) holds from the
    /// first moment, before any refresh has run.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_bootstrap_migrations(&pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgCatalog initialized");
        Ok(Self { pool })
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Trivial probe query, used by the readiness endpoint and `wait-db`.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT objid FROM tns LIMIT 0").fetch_all(&self.pool).await?;
        Ok(())
    }
}

/// Columns every read query selects. `coord` comes back as its pg_sphere
/// text literal and is decoded by the codec on the way out.
pub(crate) const RECORD_COLUMNS: &str =
    "objid, name, ra_deg, dec_deg, coord::text AS coord, extra";

pub(crate) fn row_to_record(row: &PgRow) -> Result<CatalogRecord, StorageError> {
    let coord_text: String = row.try_get("coord")?;
    let coord = SkyPoint::from_sql(&coord_text)?;
    let extra: Value = row.try_get("extra")?;
    let extra: Map<String, Value> = match extra {
        Value::Object(map) => map,
        other => {
            tracing::warn!(objid = row.try_get::<i64, _>("objid").unwrap_or(-1),
                "non-object extra column in tns row, dropping: {other}");
            Map::new()
        },
    };
    let mut record = CatalogRecord::new(
        row.try_get("objid")?,
        row.try_get("name")?,
        row.try_get("ra_deg")?,
        row.try_get("dec_deg")?,
        extra,
    );
    record.coord = coord;
    Ok(record)
}

async fn run_bootstrap_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE EXTENSION IF NOT EXISTS pg_sphere").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tns (
            objid BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            ra_deg DOUBLE PRECISION NOT NULL,
            dec_deg DOUBLE PRECISION NOT NULL,
            coord spoint NOT NULL,
            extra JSONB NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS tns_name_idx ON tns (name)").execute(pool).await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS tns_coord_idx ON tns USING gist (coord)")
        .execute(pool)
        .await?;

    tracing::info!("catalog bootstrap migrations completed");
    Ok(())
}
