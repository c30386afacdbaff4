//! Analytics snapshot and model-result endpoints.

use district_desk_api_models::{AnalyticsSnapshot, ModelResult};

use crate::{ApiClient, ApiError, execute, unwrap_list};

/// Fetches the current analytics snapshot for a district.
///
/// `GET /api/analytics/districts/{slug}/snapshot/` (bearer).
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the body cannot be
/// decoded.
pub async fn fetch_snapshot(
    client: &ApiClient,
    token: &str,
    slug: &str,
) -> Result<AnalyticsSnapshot, ApiError> {
    let req = client.get(&format!("/api/analytics/districts/{slug}/snapshot/"), Some(token));
    Ok(execute(req).await?.json().await?)
}

/// Fetches trained model results for a district.
///
/// `GET /api/analytics/districts/{slug}/models/` (bearer). Accepts
/// both a bare array and a `{"models": [...]}` wrapper.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the body does not
/// contain a model list.
pub async fn fetch_model_results(
    client: &ApiClient,
    token: &str,
    slug: &str,
) -> Result<Vec<ModelResult>, ApiError> {
    let req = client.get(&format!("/api/analytics/districts/{slug}/models/"), Some(token));
    let value: serde_json::Value = execute(req).await?.json().await?;
    unwrap_list(value, "models")
}
