use thiserror::Error;

/// Errors from the spherical-coordinate codec.
///
/// A codec failure is fatal to the value being decoded but never corrupts
/// any stored state.
#[derive(Debug, Error)]
pub enum CoordError {
    /// Text did not contain exactly two comma-separated numeric fields
    /// (for a point) or a point plus a radius (for a circle).
    #[error("malformed spherical coordinate {text:?}: expected {expected}")]
    MalformedCoordinate {
        text: String,
        expected: &'static str,
    },
}

impl CoordError {
    pub(crate) fn malformed(text: &str, expected: &'static str) -> Self {
        Self::MalformedCoordinate { text: text.to_owned(), expected }
    }
}
