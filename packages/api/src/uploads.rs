//! Data-asset upload and refresh-job endpoints.

use district_desk_api_models::{RefreshJob, UploadAsset, UploadPayload};
use reqwest::multipart;

use crate::{ApiClient, ApiError, execute, unwrap_list};

/// Lists uploaded data assets visible to the caller.
///
/// `GET /api/uploads/` (bearer). Accepts both a bare array and a
/// paginated `{"results": [...]}` body.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the body does not
/// contain an asset list.
pub async fn list_uploads(client: &ApiClient, token: &str) -> Result<Vec<UploadAsset>, ApiError> {
    let req = client.get("/api/uploads/", Some(token));
    let value: serde_json::Value = execute(req).await?.json().await?;
    unwrap_list(value, "results")
}

/// Creates a data asset from either submission path.
///
/// `POST /api/uploads/` (bearer) — multipart for files, JSON for
/// clipboard batches. The created asset is not returned; callers
/// re-fetch the upload list to reflect authoritative server state.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the server rejects the
/// payload.
pub async fn upload_asset(
    client: &ApiClient,
    token: &str,
    payload: UploadPayload,
) -> Result<(), ApiError> {
    let req = match payload {
        UploadPayload::File {
            district,
            file_name,
            bytes,
        } => {
            let form = multipart::Form::new()
                .text("district", district)
                .part("source_file", multipart::Part::bytes(bytes).file_name(file_name));
            client.post("/api/uploads/", Some(token)).multipart(form)
        }
        UploadPayload::Clipboard { district, rows } => {
            client.post("/api/uploads/", Some(token)).json(&serde_json::json!({
                "district": district,
                "data_payload": rows,
                "input_format": "clipboard",
            }))
        }
    };
    execute(req).await?;
    Ok(())
}

/// Fetches the latest refresh job, if any exist yet.
///
/// `GET /api/uploads/refresh/` (bearer). Before the first refresh the
/// backend answers a detail-only body with no job record; that maps to
/// `None` rather than an error.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails.
pub async fn fetch_refresh_status(
    client: &ApiClient,
    token: &str,
) -> Result<Option<RefreshJob>, ApiError> {
    let req = client.get("/api/uploads/refresh/", Some(token));
    let value: serde_json::Value = execute(req).await?.json().await?;
    if value.get("status").is_none() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ApiError::Parse {
            message: e.to_string(),
        })
}

/// Triggers a snapshot refresh.
///
/// `POST /api/uploads/refresh/` (bearer). While a job is already
/// running the backend answers 409; the conflict body text surfaces as
/// a normal [`ApiError::Status`].
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or a refresh is already
/// running.
pub async fn trigger_refresh(client: &ApiClient, token: &str) -> Result<RefreshJob, ApiError> {
    let req = client.post("/api/uploads/refresh/", Some(token));
    Ok(execute(req).await?.json().await?)
}
