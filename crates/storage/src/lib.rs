//! Catalog store for the TNS mirror.
//!
//! PostgreSQL with the pg_sphere extension: the `tns` table carries a
//! derived `spoint` column under a GiST index, which is what makes cone
//! search a real great-circle containment test instead of a planar
//! bounding-box approximation.

mod error;
mod pg_catalog;

pub use error::StorageError;
pub use pg_catalog::PgCatalog;
