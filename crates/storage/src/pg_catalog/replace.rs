//! Atomic catalog replace.
//!
//! The refresh pipeline rebuilds the world into a shadow table
//! (`tns_next`) — rows, derived `coord` column, name and GiST indexes —
//! and swaps it in with `DROP` + `RENAME`. PostgreSQL DDL is
//! transactional, so the whole rebuild runs inside one transaction:
//! concurrent readers see either the complete old catalog or the complete
//! new one, and never a table with rows but no spatial index.

use tns_mirror_core::CatalogRecord;

use super::PgCatalog;
use crate::error::StorageError;

/// Rows per multi-row INSERT. Six binds per row keeps chunks well under
/// the Postgres bind limit of 65535.
const INSERT_CHUNK: usize = 1000;

impl PgCatalog {
    /// Replace the entire catalog with `records`.
    ///
    /// All-or-nothing: any failure (including a duplicate `objid` from a
    /// broken feed) rolls the transaction back and leaves the previous
    /// catalog, with all its indexes, untouched and continuously
    /// queryable. Returns the number of rows loaded.
    pub async fn replace_catalog(
        &self,
        records: &[CatalogRecord],
    ) -> Result<u64, StorageError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DROP TABLE IF EXISTS tns_next").execute(&mut *tx).await?;
        sqlx::query(
            r#"
            CREATE TABLE tns_next (
                objid BIGINT CONSTRAINT tns_next_pkey PRIMARY KEY,
                name TEXT NOT NULL,
                ra_deg DOUBLE PRECISION NOT NULL,
                dec_deg DOUBLE PRECISION NOT NULL,
                coord spoint NOT NULL,
                extra JSONB NOT NULL DEFAULT '{}'
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        let mut loaded: u64 = 0;
        for chunk in records.chunks(INSERT_CHUNK) {
            let mut builder: sqlx::QueryBuilder<'_, sqlx::Postgres> = sqlx::QueryBuilder::new(
                "INSERT INTO tns_next (objid, name, ra_deg, dec_deg, coord, extra) ",
            );
            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.objid)
                    .push_bind(record.name.as_str())
                    .push_bind(record.ra_deg)
                    .push_bind(record.dec_deg)
                    .push_bind(record.coord.to_sql())
                    .push_unseparated("::spoint")
                    .push_bind(serde_json::Value::Object(record.extra.clone()));
            });
            let result = builder.build().execute(&mut *tx).await?;
            loaded += result.rows_affected();
        }

        // Indexes built before the swap so the new table is never visible
        // without them.
        sqlx::query("CREATE INDEX tns_next_name_idx ON tns_next (name)")
            .execute(&mut *tx)
            .await?;
        sqlx::query("CREATE INDEX tns_next_coord_idx ON tns_next USING gist (coord)")
            .execute(&mut *tx)
            .await?;

        sqlx::query("DROP TABLE IF EXISTS tns").execute(&mut *tx).await?;
        sqlx::query("ALTER TABLE tns_next RENAME TO tns").execute(&mut *tx).await?;
        sqlx::query("ALTER TABLE tns RENAME CONSTRAINT tns_next_pkey TO tns_pkey")
            .execute(&mut *tx)
            .await?;
        sqlx::query("ALTER INDEX tns_next_name_idx RENAME TO tns_name_idx")
            .execute(&mut *tx)
            .await?;
        sqlx::query("ALTER INDEX tns_next_coord_idx RENAME TO tns_coord_idx")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(rows = loaded, "catalog replaced");
        Ok(loaded)
    }
}
