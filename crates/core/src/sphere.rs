//! Spherical-coordinate codec.
//!
//! Sky positions are degrees in memory and radians on disk: PostgreSQL's
//! pg_sphere types (`spoint`, `scircle`) take radian literals in a
//! parenthesized / angle-bracket tuple syntax. This module is the single
//! serialization boundary between the two representations — the storage
//! layer calls `to_sql` / `from_sql` deliberately at its edges instead of
//! hooking codecs into the driver.

use serde::{Deserialize, Serialize};

use crate::constants::ARCSEC_PER_DEG;
use crate::error::CoordError;

/// A position on the celestial sphere.
///
/// `ra_deg` is right ascension in `[0, 360)`, `dec_deg` is declination in
/// `[-90, 90]`, both degrees. Range enforcement is the HTTP layer's job;
/// this type only converts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPoint {
    #[serde(rename = "ra")]
    pub ra_deg: f64,
    #[serde(rename = "dec")]
    pub dec_deg: f64,
}

impl SkyPoint {
    pub const fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self { ra_deg, dec_deg }
    }

    /// Right ascension in radians.
    #[must_use]
    pub fn ra_rad(&self) -> f64 {
        self.ra_deg.to_radians()
    }

    /// Declination in radians.
    #[must_use]
    pub fn dec_rad(&self) -> f64 {
        self.dec_deg.to_radians()
    }

    /// Encode as a pg_sphere `spoint` literal: `(ra_rad, dec_rad)`.
    ///
    /// Rust's shortest-roundtrip f64 formatting keeps full precision, so
    /// `from_sql(to_sql())` reproduces the degree values exactly up to
    /// IEEE-754 rounding of the degree/radian conversion itself.
    #[must_use]
    pub fn to_sql(&self) -> String {
        format!("({}, {})", self.ra_rad(), self.dec_rad())
    }

    /// Decode a pg_sphere `spoint` literal back to degrees.
    ///
    /// # Errors
    /// `MalformedCoordinate` unless the text holds exactly two
    /// comma-separated numeric fields.
    pub fn from_sql(text: &str) -> Result<Self, CoordError> {
        let inner = text.trim().trim_start_matches('(').trim_end_matches(')');
        let fields: Vec<&str> = inner.split(',').collect();
        let [ra, dec] = fields.as_slice() else {
            return Err(CoordError::malformed(text, "two comma-separated fields"));
        };
        let ra_rad: f64 = ra
            .trim()
            .parse()
            .map_err(|_| CoordError::malformed(text, "numeric right ascension"))?;
        let dec_rad: f64 = dec
            .trim()
            .parse()
            .map_err(|_| CoordError::malformed(text, "numeric declination"))?;
        Ok(Self::new(ra_rad.to_degrees(), dec_rad.to_degrees()))
    }
}

/// A circular search region: center plus radius in arcseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyCircle {
    pub center: SkyPoint,
    pub radius_arcsec: f64,
}

impl SkyCircle {
    pub const fn new(center: SkyPoint, radius_arcsec: f64) -> Self {
        Self { center, radius_arcsec }
    }

    /// Radius in radians.
    #[must_use]
    pub fn radius_rad(&self) -> f64 {
        (self.radius_arcsec / ARCSEC_PER_DEG).to_radians()
    }

    /// Encode as a pg_sphere `scircle` literal: `<(ra_rad, dec_rad), radius_rad>`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        format!("<{}, {}>", self.center.to_sql(), self.radius_rad())
    }

    /// Decode a pg_sphere `scircle` literal, radius back to arcseconds.
    ///
    /// # Errors
    /// `MalformedCoordinate` when the point or the trailing radius field
    /// is missing or non-numeric.
    pub fn from_sql(text: &str) -> Result<Self, CoordError> {
        let inner = text.trim().trim_start_matches('<').trim_end_matches('>');
        let (point, radius) = inner
            .rsplit_once(',')
            .ok_or_else(|| CoordError::malformed(text, "point and radius"))?;
        let center = SkyPoint::from_sql(point)?;
        let radius_rad: f64 = radius
            .trim()
            .parse()
            .map_err(|_| CoordError::malformed(text, "numeric radius"))?;
        Ok(Self::new(center, radius_rad.to_degrees() * ARCSEC_PER_DEG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    const EPS_DEG: f64 = 1e-9;

    #[test]
    fn point_roundtrips_through_sql_literal() {
        let mut rng = StdRng::seed_from_u64(20_180_423);
        for _ in 0..1000 {
            let p = SkyPoint::new(rng.gen_range(0.0..360.0), rng.gen_range(-90.0..=90.0));
            let back = SkyPoint::from_sql(&p.to_sql()).unwrap();
            assert!((back.ra_deg - p.ra_deg).abs() < EPS_DEG, "ra drift for {p:?}");
            assert!((back.dec_deg - p.dec_deg).abs() < EPS_DEG, "dec drift for {p:?}");
        }
    }

    #[test]
    fn circle_roundtrips_through_sql_literal() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let c = SkyCircle::new(
                SkyPoint::new(rng.gen_range(0.0..360.0), rng.gen_range(-90.0..=90.0)),
                rng.gen_range(f64::MIN_POSITIVE..=3600.0),
            );
            let back = SkyCircle::from_sql(&c.to_sql()).unwrap();
            assert!((back.radius_arcsec - c.radius_arcsec).abs() < 1e-9 * c.radius_arcsec.max(1.0));
            assert!((back.center.ra_deg - c.center.ra_deg).abs() < EPS_DEG);
        }
    }

    #[test]
    fn point_literal_format_matches_pg_sphere() {
        let p = SkyPoint::new(180.0, 0.0);
        let text = p.to_sql();
        assert!(text.starts_with('(') && text.ends_with(')'), "{text}");
        assert!(text.ends_with(", 0)"), "dec 0 should encode as radian 0: {text}");
        let back = SkyPoint::from_sql(&text).unwrap();
        assert!((back.ra_deg - 180.0).abs() < EPS_DEG);
    }

    #[test]
    fn circle_literal_is_angle_bracketed() {
        let c = SkyCircle::new(SkyPoint::new(0.0, 0.0), 3600.0);
        let text = c.to_sql();
        assert!(text.starts_with("<(") && text.ends_with('>'), "{text}");
        // 1 degree radius in radians
        assert!(text.contains(&format!("{}", 1.0_f64.to_radians())));
    }

    #[test]
    fn malformed_point_is_rejected() {
        for bad in ["", "(1)", "(1, 2, 3)", "(a, b)", "(1; 2)"] {
            assert!(SkyPoint::from_sql(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn malformed_circle_is_rejected() {
        for bad in ["", "<(1, 2)>", "<(1, 2), x>", "<1>"] {
            assert!(SkyCircle::from_sql(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn point_serializes_as_degrees() {
        let json = serde_json::to_value(SkyPoint::new(10.5, -20.25)).unwrap();
        assert_eq!(json, serde_json::json!({"ra": 10.5, "dec": -20.25}));
    }
}
