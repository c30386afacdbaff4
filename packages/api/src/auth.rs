//! Authentication and account endpoints.

use district_desk_api_models::{AccountRequest, District, OfficerProfile, TokenPair};

use crate::{ApiClient, ApiError, execute, unwrap_list};

/// Exchanges credentials for an access/refresh token pair.
///
/// `POST /api/auth/token/`. On failure the server's error text is
/// surfaced to the caller unchanged.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or credentials are
/// rejected.
pub async fn login(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> Result<TokenPair, ApiError> {
    let req = client.post("/api/auth/token/", None).json(&serde_json::json!({
        "username": username,
        "password": password,
    }));
    Ok(execute(req).await?.json().await?)
}

/// Fetches the officer profile for a bearer token.
///
/// `GET /api/accounts/profile/`. A failure here is treated by the
/// session layer as token invalidity.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the token is invalid.
pub async fn fetch_profile(client: &ApiClient, token: &str) -> Result<OfficerProfile, ApiError> {
    let req = client.get("/api/accounts/profile/", Some(token));
    Ok(execute(req).await?.json().await?)
}

/// Lists the published district directory.
///
/// `GET /api/accounts/districts/` (public). Accepts both a bare array
/// and a paginated `{"results": [...]}` body.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the body does not
/// contain a district list.
pub async fn fetch_districts(client: &ApiClient) -> Result<Vec<District>, ApiError> {
    let req = client.get("/api/accounts/districts/", None);
    let value: serde_json::Value = execute(req).await?.json().await?;
    unwrap_list(value, "results")
}

/// Submits a dashboard access request.
///
/// `POST /api/accounts/requests/` (public).
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or is rejected.
pub async fn request_access(client: &ApiClient, request: &AccountRequest) -> Result<(), ApiError> {
    let req = client.post("/api/accounts/requests/", None).json(request);
    execute(req).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_list_accepts_both_shapes() {
        let district = serde_json::json!({
            "id": 1,
            "name": "East",
            "slug": "east",
            "description": "",
            "beats": []
        });
        let bare: Vec<District> =
            unwrap_list(serde_json::json!([district.clone()]), "results").unwrap();
        let wrapped: Vec<District> =
            unwrap_list(serde_json::json!({ "results": [district] }), "results").unwrap();
        assert_eq!(bare[0].slug, "east");
        assert_eq!(wrapped[0].slug, "east");
    }
}
