#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the district analytics backend.
//!
//! All interfaces here are consumed, not defined — the backend owns
//! every payload shape. The client normalizes two backend quirks at
//! this boundary so callers never see them:
//!
//! 1. Non-2xx responses become [`ApiError::Status`] carrying the
//!    response body text verbatim (or the canonical status reason when
//!    the body is empty).
//! 2. List endpoints that answer either a bare array or a
//!    wrapper object (`{"results": [...]}`, `{"models": [...]}`) are
//!    unwrapped by [`unwrap_list`] into a plain `Vec`.
//!
//! Endpoint functions live in one module per backend app: [`auth`],
//! [`analytics`], [`uploads`], [`geo`].

pub mod analytics;
pub mod auth;
pub mod geo;
pub mod uploads;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "DISTRICT_DESK_API_URL";

/// Base URL used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Errors from backend API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, TLS, body read, JSON decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status. The message is the
    /// response body text, surfaced to the UI unchanged.
    #[error("{message}")]
    Status {
        /// HTTP status code of the response.
        status: reqwest::StatusCode,
        /// Response body text, or the canonical status reason when the
        /// body was empty.
        message: String,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the mismatch.
        message: String,
    },
}

/// Client for the district analytics backend.
///
/// Owns the connection pool and the base URL. Bearer tokens are passed
/// per call by the session layer rather than stored here, so a demoted
/// session can never leave a stale token behind in the client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against the given base URL.
    ///
    /// A trailing slash on `base_url` is trimmed so endpoint paths can
    /// always start with `/`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Creates a client from `DISTRICT_DESK_API_URL`, falling back to
    /// [`DEFAULT_API_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    /// The configured base URL (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds a GET request for `endpoint`, attaching a bearer token
    /// when one is given.
    pub(crate) fn get(&self, endpoint: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let req = self.http.get(self.url(endpoint));
        Self::authorize(req, token)
    }

    /// Builds a POST request for `endpoint`, attaching a bearer token
    /// when one is given.
    pub(crate) fn post(&self, endpoint: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let req = self.http.post(self.url(endpoint));
        Self::authorize(req, token)
    }

    fn authorize(req: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

/// Sends a request and normalizes non-2xx responses into
/// [`ApiError::Status`] with the body text as the message.
///
/// # Errors
///
/// Returns [`ApiError::Http`] on transport failure and
/// [`ApiError::Status`] on a non-success status.
pub(crate) async fn execute(req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| status.to_string(), ToString::to_string)
    } else {
        body
    };
    log::debug!("API request failed with {status}: {message}");

    Err(ApiError::Status { status, message })
}

/// Unwraps a list endpoint response that is either a bare JSON array
/// or an object wrapping the array under `key`.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] if neither shape matches or an element
/// fails to deserialize.
pub(crate) fn unwrap_list<T: DeserializeOwned>(
    value: serde_json::Value,
    key: &str,
) -> Result<Vec<T>, ApiError> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove(key) {
            Some(serde_json::Value::Array(items)) => items,
            Some(other) => {
                return Err(ApiError::Parse {
                    message: format!("'{key}' is not an array: {other}"),
                });
            }
            None => {
                return Err(ApiError::Parse {
                    message: format!("response object missing '{key}' array"),
                });
            }
        },
        other => {
            return Err(ApiError::Parse {
                message: format!("expected array or object response, got {other}"),
            });
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| ApiError::Parse {
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use district_desk_api_models::UploadAsset;

    fn asset_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "district": "east",
            "status": "processed",
            "row_count": 42,
            "created_at": "2024-03-01T08:00:00Z"
        })
    }

    #[test]
    fn unwraps_bare_array() {
        let value = serde_json::json!([asset_json("a1"), asset_json("a2")]);
        let list: Vec<UploadAsset> = unwrap_list(value, "results").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "a1");
    }

    #[test]
    fn unwraps_wrapped_array() {
        let value = serde_json::json!({ "results": [asset_json("a1")] });
        let list: Vec<UploadAsset> = unwrap_list(value, "results").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "a1");
    }

    #[test]
    fn both_shapes_normalize_identically() {
        let bare: Vec<UploadAsset> =
            unwrap_list(serde_json::json!([asset_json("a1")]), "results").unwrap();
        let wrapped: Vec<UploadAsset> =
            unwrap_list(serde_json::json!({ "results": [asset_json("a1")] }), "results").unwrap();
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            serde_json::to_value(&wrapped).unwrap()
        );
    }

    #[test]
    fn rejects_object_without_key() {
        let value = serde_json::json!({ "detail": "nope" });
        let err = unwrap_list::<UploadAsset>(value, "results").unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
