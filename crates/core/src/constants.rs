//! Shared constants for the TNS mirror.
//!
//! Centralizes numbers that would otherwise be duplicated across crates.

/// Maximum cone-search radius, degrees.
pub const MAX_RADIUS_DEG: f64 = 1.0;

/// Maximum cone-search radius, arcseconds. Spherical containment queries
/// degrade near large-angle cases, and this also caps result-set cost.
pub const MAX_RADIUS_ARCSEC: f64 = 3600.0 * MAX_RADIUS_DEG;

/// Arcseconds per degree.
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Bulk feed with every public TNS object, zipped CSV.
pub const DEFAULT_CATALOG_URL: &str =
    "https://www.wis-tns.org/system/files/tns_public_objects/tns_public_objects.csv.zip";

/// Default timeout for the bulk feed download, seconds. The feed is tens of
/// megabytes and the upstream server is slow, so this is generous.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 600;
