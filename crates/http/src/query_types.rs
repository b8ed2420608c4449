//! Request/query types (Deserialize) and their validation.
//!
//! Range checks on `ra`/`dec` live here, at the HTTP edge — the storage
//! layer assumes pre-validated coordinates and enforces only the radius
//! cap. Missing or non-numeric parameters are rejected by axum's `Query`
//! extractor before these types are ever built.

use serde::Deserialize;
use tns_mirror_core::{SkyCircle, SkyPoint, MAX_RADIUS_ARCSEC};

use crate::api_error::ApiError;

/// `GET /api/v1/circle` parameters. All three mandatory.
#[derive(Debug, Deserialize)]
pub struct CircleQuery {
    pub ra: f64,
    pub dec: f64,
    pub radius_arcsec: f64,
}

impl CircleQuery {
    /// Validate ranges and build the search circle.
    pub fn into_circle(self) -> Result<SkyCircle, ApiError> {
        if !(self.ra >= 0.0 && self.ra < 360.0) {
            return Err(ApiError::BadRequest(format!(
                "\"ra\" should be in [0, 360), got {}",
                self.ra
            )));
        }
        if !(self.dec >= -90.0 && self.dec <= 90.0) {
            return Err(ApiError::BadRequest(format!(
                "\"dec\" should be in [-90, 90], got {}",
                self.dec
            )));
        }
        if !(self.radius_arcsec > 0.0 && self.radius_arcsec <= MAX_RADIUS_ARCSEC) {
            return Err(ApiError::BadRequest(format!(
                "\"radius_arcsec\" should be positive and at most {MAX_RADIUS_ARCSEC}, got {}",
                self.radius_arcsec
            )));
        }
        Ok(SkyCircle::new(SkyPoint::new(self.ra, self.dec), self.radius_arcsec))
    }
}

/// `GET /api/v1/object` parameters.
#[derive(Debug, Deserialize)]
pub struct ObjectQuery {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(ra: f64, dec: f64, radius_arcsec: f64) -> CircleQuery {
        CircleQuery { ra, dec, radius_arcsec }
    }

    #[test]
    fn valid_query_builds_a_circle() {
        let circle = query(359.9995, 0.0, 5.0).into_circle().unwrap();
        assert!((circle.center.ra_deg - 359.9995).abs() < 1e-12);
        assert!((circle.radius_arcsec - 5.0).abs() < 1e-12);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        assert!(query(10.0, 20.0, 3600.0).into_circle().is_ok());
        assert!(query(10.0, 20.0, 3600.0001).into_circle().is_err());
        assert!(query(10.0, 20.0, 0.0).into_circle().is_err());
    }

    #[test]
    fn coordinates_outside_their_ranges_are_rejected() {
        assert!(query(360.0, 0.0, 1.0).into_circle().is_err());
        assert!(query(-0.1, 0.0, 1.0).into_circle().is_err());
        assert!(query(0.0, 90.0, 1.0).into_circle().is_ok());
        assert!(query(0.0, 90.5, 1.0).into_circle().is_err());
        assert!(query(f64::NAN, 0.0, 1.0).into_circle().is_err());
    }

    #[test]
    fn missing_parameters_fail_deserialization() {
        let err = serde_urlencoded::from_str::<CircleQuery>("ra=10&dec=20");
        assert!(err.is_err());
    }
}
