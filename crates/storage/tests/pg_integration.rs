//! Integration tests for PgCatalog against a real PostgreSQL with pg_sphere.
//! Run with: DATABASE_URL=... cargo test -p tns-mirror-storage -- --ignored --test-threads=1
//!
//! Single-threaded because every test replaces the one shared `tns` table.

#![allow(clippy::unwrap_used, reason = "integration test code")]

use serde_json::Map;
use tns_mirror_core::{CatalogRecord, SkyCircle, SkyPoint};
use tns_mirror_storage::{PgCatalog, StorageError};

async fn connect() -> PgCatalog {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgCatalog integration tests");
    PgCatalog::new(&url).await.expect("failed to connect to PostgreSQL")
}

fn record(objid: i64, name: &str, ra_deg: f64, dec_deg: f64) -> CatalogRecord {
    let mut extra = Map::new();
    extra.insert("type".to_owned(), serde_json::Value::from("SN Ia"));
    CatalogRecord::new(objid, name.to_owned(), ra_deg, dec_deg, extra)
}

fn circle(ra_deg: f64, dec_deg: f64, radius_arcsec: f64) -> SkyCircle {
    SkyCircle::new(SkyPoint::new(ra_deg, dec_deg), radius_arcsec)
}

#[tokio::test]
#[ignore]
async fn cone_search_includes_center_and_excludes_nearby() {
    let catalog = connect().await;
    catalog
        .replace_catalog(&[record(1, "2018lwh", 10.0, 20.0), record(2, "2018aaa", 10.001, 20.0)])
        .await
        .unwrap();

    // Record 2 sits ~3.4 arcsec away (10.001 deg of ra at dec 20), outside
    // a 1 arcsec circle.
    let hits = catalog.search_in_circle(&circle(10.0, 20.0, 1.0)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].objid, 1);

    // A 10 arcsec circle captures both; ordering is ascending objid.
    let hits = catalog.search_in_circle(&circle(10.0, 20.0, 10.0)).await.unwrap();
    assert_eq!(hits.iter().map(|r| r.objid).collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
#[ignore]
async fn cone_search_wraps_across_the_antimeridian() {
    let catalog = connect().await;
    catalog.replace_catalog(&[record(1, "2019abc", 0.0005, 0.0)]).await.unwrap();

    // Center on the far side of the 0/360 seam, ~3.6 arcsec of great-circle
    // distance away. A planar treatment would miss this.
    let hits = catalog.search_in_circle(&circle(359.9995, 0.0, 5.0)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "2019abc");
}

#[tokio::test]
#[ignore]
async fn radius_out_of_range_is_rejected_before_the_query() {
    let catalog = connect().await;
    for radius in [0.0, -5.0, 3600.0001] {
        let err = catalog.search_in_circle(&circle(10.0, 20.0, radius)).await.unwrap_err();
        assert!(matches!(err, StorageError::RadiusOutOfRange { .. }), "radius {radius}: {err}");
    }
    // The cap itself is accepted.
    catalog.search_in_circle(&circle(10.0, 20.0, 3600.0)).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn duplicate_names_resolve_to_the_lowest_objid() {
    let catalog = connect().await;
    catalog
        .replace_catalog(&[record(7, "2018lwh", 10.0, 20.0), record(3, "2018lwh", 50.0, -10.0)])
        .await
        .unwrap();

    let found = catalog.get_by_name("2018lwh").await.unwrap();
    assert_eq!(found.objid, 3);

    let err = catalog.get_by_name("definitely-not-a-transient").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
#[ignore]
async fn failed_replace_leaves_the_old_catalog_intact() {
    let catalog = connect().await;
    catalog
        .replace_catalog(&[record(1, "2018lwh", 10.0, 20.0), record(2, "2018aaa", 30.0, 40.0)])
        .await
        .unwrap();

    // Duplicate objid violates the shadow table's primary key mid-replace;
    // the transaction must roll back without touching the live table.
    let err = catalog
        .replace_catalog(&[record(5, "2020xyz", 1.0, 2.0), record(5, "2020xyz", 3.0, 4.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Database(_)), "{err}");

    let all = catalog.get_all().await.unwrap();
    assert_eq!(all.iter().map(|r| r.objid).collect::<Vec<_>>(), vec![1, 2]);
    // Spatial index still answers after the failed swap.
    let hits = catalog.search_in_circle(&circle(30.0, 40.0, 1.0)).await.unwrap();
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
#[ignore]
async fn replace_is_idempotent_for_an_unchanged_feed() {
    let catalog = connect().await;
    let rows = vec![record(1, "2018lwh", 10.0, 20.0), record(2, "2018aaa", 30.0, 40.0)];

    let first = catalog.replace_catalog(&rows).await.unwrap();
    let after_first = catalog.get_all().await.unwrap();
    let second = catalog.replace_catalog(&rows).await.unwrap();
    let after_second = catalog.get_all().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(after_first.len(), after_second.len());
    for (a, b) in after_first.iter().zip(after_second.iter()) {
        assert_eq!(a.objid, b.objid);
        assert_eq!(a.name, b.name);
        assert_eq!(serde_json::to_value(a).unwrap(), serde_json::to_value(b).unwrap());
    }
}

#[tokio::test]
#[ignore]
async fn coord_column_roundtrips_in_degrees() {
    let catalog = connect().await;
    catalog.replace_catalog(&[record(1, "2021def", 123.456789, -54.321)]).await.unwrap();

    let found = catalog.get_by_name("2021def").await.unwrap();
    assert!((found.coord.ra_deg - 123.456789).abs() < 1e-9);
    assert!((found.coord.dec_deg - (-54.321)).abs() < 1e-9);
    assert_eq!(found.extra["type"], "SN Ia");
}

#[tokio::test]
#[ignore]
async fn ping_succeeds_once_bootstrapped() {
    let catalog = connect().await;
    catalog.ping().await.unwrap();
}
