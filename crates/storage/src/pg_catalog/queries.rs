//! Read-side query operations.
//!
//! Result ordering: every multi-row query orders by ascending `objid`.
//! The contract leaves ordering unspecified, but an undocumented
//! nondeterministic order would leak into callers, so it is pinned here.

use tns_mirror_core::{CatalogRecord, SkyCircle, MAX_RADIUS_ARCSEC};

use super::{row_to_record, PgCatalog, RECORD_COLUMNS};
use crate::error::StorageError;

impl PgCatalog {
    /// First record with the given name, by ascending `objid`.
    ///
    /// Names are not unique upstream; duplicates never error, the lowest
    /// `objid` wins.
    ///
    /// # Errors
    /// `NotFound` when zero rows match.
    pub async fn get_by_name(&self, name: &str) -> Result<CatalogRecord, StorageError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM tns WHERE name = $1 ORDER BY objid LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(name)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| StorageError::NotFound { entity: "object", key: name.to_owned() })?;
        row_to_record(&row)
    }

    /// Full catalog scan, ascending `objid`.
    ///
    /// Unpaginated by contract: the catalog is a finite moderate-size
    /// mirror. Revisit if upstream ever grows past low millions of rows.
    pub async fn get_all(&self) -> Result<Vec<CatalogRecord>, StorageError> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM tns ORDER BY objid");
        let rows = sqlx::query(&query).fetch_all(self.pool()).await?;
        rows.iter().map(row_to_record).collect()
    }

    /// Cone search: all records whose position lies inside the circle.
    ///
    /// Containment (`coord @ scircle`) is pg_sphere's great-circle test
    /// against the GiST index — boundary inclusive, correct across the
    /// 0/360° seam and near the poles where lat/long boxes distort.
    /// Assumes pre-validated ra/dec; only the radius cap is enforced here.
    ///
    /// # Errors
    /// `RadiusOutOfRange` unless `0 < radius_arcsec <= MAX_RADIUS_ARCSEC`.
    pub async fn search_in_circle(
        &self,
        circle: &SkyCircle,
    ) -> Result<Vec<CatalogRecord>, StorageError> {
        validate_radius(circle.radius_arcsec)?;
        let query =
            format!("SELECT {RECORD_COLUMNS} FROM tns WHERE coord @ $1::scircle ORDER BY objid");
        let rows = sqlx::query(&query).bind(circle.to_sql()).fetch_all(self.pool()).await?;
        rows.iter().map(row_to_record).collect()
    }
}

/// NaN fails both comparisons and is rejected along with everything else
/// outside `(0, MAX_RADIUS_ARCSEC]`.
fn validate_radius(radius_arcsec: f64) -> Result<(), StorageError> {
    if radius_arcsec > 0.0 && radius_arcsec <= MAX_RADIUS_ARCSEC {
        Ok(())
    } else {
        Err(StorageError::RadiusOutOfRange { radius_arcsec })
    }
}

#[cfg(test)]
mod tests {
    use super::validate_radius;
    use crate::error::StorageError;
    use tns_mirror_core::{SkyCircle, SkyPoint};

    #[test]
    fn radius_cap_is_inclusive() {
        assert!(validate_radius(3600.0).is_ok());
        assert!(validate_radius(1.0).is_ok());
        for bad in [3600.0001, 0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(validate_radius(bad), Err(StorageError::RadiusOutOfRange { .. })),
                "accepted radius {bad}"
            );
        }
    }

    #[test]
    fn circle_binds_as_scircle_literal() {
        let circle = SkyCircle::new(SkyPoint::new(10.0, 20.0), 1.0);
        let literal = circle.to_sql();
        assert!(literal.starts_with('<') && literal.ends_with('>'));
        let back = SkyCircle::from_sql(&literal).unwrap();
        assert!((back.radius_arcsec - 1.0).abs() < 1e-9);
    }
}
