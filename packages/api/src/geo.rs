//! Boundary-layer endpoints.
//!
//! Both layers are `GeoJSON` `FeatureCollection`s proxied by the
//! backend from the municipal GIS service. They are not
//! district-specific and require no authentication.

use geojson::FeatureCollection;

use crate::{ApiClient, ApiError, execute};

/// Fetches district boundary polygons.
///
/// `GET /api/geo/districts/` (public).
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the body is not a
/// feature collection.
pub async fn fetch_district_geo(client: &ApiClient) -> Result<FeatureCollection, ApiError> {
    let req = client.get("/api/geo/districts/", None);
    Ok(execute(req).await?.json().await?)
}

/// Fetches beat boundary polygons.
///
/// `GET /api/geo/beats/` (public).
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the body is not a
/// feature collection.
pub async fn fetch_beat_geo(client: &ApiClient) -> Result<FeatureCollection, ApiError> {
    let req = client.get("/api/geo/beats/", None);
    Ok(execute(req).await?.json().await?)
}
