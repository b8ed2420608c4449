//! Catalog record: one transient event mirrored from the upstream feed.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::sphere::SkyPoint;

/// One transient-event entry.
///
/// `objid` is the upstream-assigned primary key. `name` is *not* unique —
/// the upstream feed tolerates duplicates, so we do too. Columns beyond the
/// fixed four are upstream-defined and pass through `extra` untouched; the
/// map holds tagged scalars only (string / number / bool / null), keyed by
/// upstream column name in lexicographic order.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogRecord {
    pub objid: i64,
    pub name: String,
    pub ra_deg: f64,
    pub dec_deg: f64,
    /// Derived from `ra_deg`/`dec_deg` at ingest time, rendered as
    /// `{"ra": deg, "dec": deg}` in API responses.
    pub coord: SkyPoint,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogRecord {
    pub fn new(objid: i64, name: String, ra_deg: f64, dec_deg: f64, extra: Map<String, Value>) -> Self {
        Self { objid, name, ra_deg, dec_deg, coord: SkyPoint::new(ra_deg, dec_deg), extra }
    }
}

/// Classify one upstream CSV field into a tagged scalar.
///
/// The feed is all text; numbers are detected by parsing, empty fields map
/// to null. Anything else stays a string, including values like `2018lwh`
/// that merely start with digits.
#[must_use]
pub fn tag_scalar(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(field.to_owned())
}
