//! Query-path handlers: cone search, name lookup, full dump.
//!
//! All three are read-only and request-parallel; each one costs a single
//! round trip to the store. Records serialize with their upstream columns
//! flattened and `coord` rendered as `{ra, dec}` degrees.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use tns_mirror_core::CatalogRecord;

use crate::api_error::ApiError;
use crate::query_types::{CircleQuery, ObjectQuery};
use crate::AppState;

pub async fn all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CatalogRecord>>, ApiError> {
    Ok(Json(state.catalog.get_all().await?))
}

pub async fn circle(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CircleQuery>,
) -> Result<Json<Vec<CatalogRecord>>, ApiError> {
    let circle = query.into_circle()?;
    Ok(Json(state.catalog.search_in_circle(&circle).await?))
}

pub async fn object(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ObjectQuery>,
) -> Result<Json<CatalogRecord>, ApiError> {
    Ok(Json(state.catalog.get_by_name(&query.name).await?))
}
