#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View-model types for the district analytics backend.
//!
//! Every type here mirrors a JSON payload owned by the backend service;
//! this client consumes the shapes but does not define them. Snapshot
//! sub-payloads that may legitimately be absent deserialize to empty
//! collections rather than erroring, so downstream derivations never
//! have to null-check.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A row of a cross-tabulation payload: loosely-typed column -> value.
///
/// The backend emits these for `hourly_breakdown` and `beat_vs_weekday`,
/// where the key set varies with the uploaded data.
pub type CrosstabRow = serde_json::Map<String, serde_json::Value>;

/// Access/refresh token pair returned by the auth endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer token sent on every authenticated request.
    pub access: String,
    /// Refresh token. Persisted alongside the access token but never
    /// exchanged by this client (token rotation is a backend concern).
    pub refresh: String,
}

/// Per-column descriptive statistics from the EDA payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetrics {
    /// Pandas-style type tag (e.g. "int64", "object").
    pub dtype: String,
    /// Count of non-null values.
    pub non_null: u64,
    /// Percentage of null values, 0-100.
    pub null_pct: f64,
    /// Count of unique values.
    pub unique: u64,
    /// Numeric summary stats (mean/std/min/max/...), numeric columns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BTreeMap<String, f64>>,
    /// Histogram bins and counts, numeric columns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
    /// Most frequent values, categorical columns only. Ordered by
    /// descending frequency by backend convention; not enforced here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_values: Option<Vec<TopValue>>,
}

/// Parallel bin-edge and count sequences for a numeric column.
///
/// `counts` has one fewer element than `bins` by backend convention;
/// consumers operate on `counts` alone and tolerate a mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges.
    pub bins: Vec<f64>,
    /// Per-bin counts.
    pub counts: Vec<u64>,
}

/// A label/count pair from a column's most-frequent-value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopValue {
    /// Stringified value label.
    pub label: String,
    /// Occurrence count.
    pub count: u64,
}

/// One month's incident count in the monthly trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    /// Period label, e.g. "2024-03".
    #[serde(rename = "Year_Month")]
    pub year_month: String,
    /// Incident count for the period.
    pub count: u64,
}

/// Cross-tabulations computed by the backend for one district.
///
/// All collections default to empty: snapshot shape legitimately varies
/// across districts and time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultivariatePayload {
    /// Pairwise correlation rows (loosely typed; rendered verbatim).
    #[serde(default)]
    pub correlations: Vec<CrosstabRow>,
    /// Monthly incident counts.
    #[serde(default)]
    pub monthly_counts: Vec<MonthlyCount>,
    /// Per-hour rows keyed by `Hour` plus one key per crime category.
    #[serde(default)]
    pub hourly_breakdown: Vec<CrosstabRow>,
    /// Per-beat rows keyed by `Beats` plus one count field per weekday.
    #[serde(default)]
    pub beat_vs_weekday: Vec<CrosstabRow>,
}

/// Feature importance assigned to a single input column by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    /// Feature (column) name.
    pub feature: String,
    /// Relative importance.
    pub importance: f64,
}

/// Validation and held-out test metrics for one model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Metrics on the validation split.
    #[serde(default)]
    pub validation: BTreeMap<String, f64>,
    /// Metrics on the test split.
    #[serde(default)]
    pub test: BTreeMap<String, f64>,
}

/// One trained model variant (baseline or tuned).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResult {
    /// Model name (e.g. "RandomForest").
    pub name: String,
    /// Whether hyperparameters were tuned.
    #[serde(default)]
    pub tuned: bool,
    /// Hyperparameters, opaque to this client.
    #[serde(default)]
    pub parameters: serde_json::Value,
    /// Validation/test metric mappings.
    #[serde(default)]
    pub metrics: ModelMetrics,
    /// Feature importances, pre-sorted descending by the backend.
    /// Consumers slice the head and never re-sort.
    #[serde(default)]
    pub feature_importances: Vec<FeatureImportance>,
}

/// Machine-learning summary attached to a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MlPayload {
    /// Target column the models predict.
    #[serde(default)]
    pub target: String,
    /// Input feature columns.
    #[serde(default)]
    pub feature_columns: Vec<String>,
    /// Train/validation/test row counts.
    #[serde(default)]
    pub split_counts: BTreeMap<String, u64>,
    /// Trained model variants.
    #[serde(default)]
    pub models: Vec<ModelResult>,
}

/// An incident flagged as statistically unusual by the backend scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Case number of the flagged incident.
    #[serde(rename = "Case Number")]
    pub case_number: String,
    /// Occurrence timestamp as reported in the source data.
    #[serde(rename = "Date/Time Occurred")]
    pub occurred_at: String,
    /// Beat the incident was recorded in.
    #[serde(rename = "Beats")]
    pub beat: String,
    /// Crime category label.
    #[serde(rename = "Crime_Category")]
    pub category: String,
    /// Anomaly score; more negative is more unusual.
    pub anomaly_score: f64,
}

/// Anomaly list attached to a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomaliesPayload {
    /// Flagged incidents.
    #[serde(default)]
    pub anomalies: Vec<AnomalyRecord>,
}

/// A precomputed analytics bundle for one district at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Snapshot identifier.
    pub id: String,
    /// Per-column descriptive statistics, keyed by column name. Column
    /// keys are stable identifiers reused across all panels.
    #[serde(default)]
    pub eda_payload: BTreeMap<String, ColumnMetrics>,
    /// Cross-tabulations.
    #[serde(default)]
    pub multivariate_payload: MultivariatePayload,
    /// Model training summary.
    #[serde(default)]
    pub ml_payload: MlPayload,
    /// Flagged anomalies.
    #[serde(default)]
    pub anomalies_payload: AnomaliesPayload,
    /// When the backend generated this snapshot.
    pub generated_at: DateTime<Utc>,
}

/// Server-controlled lifecycle state of an uploaded data asset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UploadStatus {
    /// Stored, not yet queued for processing.
    Uploaded,
    /// Queued for the next refresh job.
    Queued,
    /// Being processed by a refresh job.
    Processing,
    /// Processing failed.
    Failed,
    /// Fully processed into the current snapshot.
    Processed,
    /// Any status value this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// How an upload entered the system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputFormat {
    /// Uploaded as a spreadsheet file.
    File,
    /// Pasted as tabular text.
    Clipboard,
}

/// One ingested file or pasted batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAsset {
    /// Asset identifier.
    pub id: String,
    /// Owning district slug.
    pub district: String,
    /// Server-controlled processing status.
    pub status: UploadStatus,
    /// Number of data rows in the asset.
    #[serde(default)]
    pub row_count: u64,
    /// How the asset was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<InputFormat>,
    /// When the asset was created.
    pub created_at: DateTime<Utc>,
    /// When processing finished, if it has.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

/// A parsed row of pasted tabular text: header field -> string value.
pub type ClipboardRow = serde_json::Map<String, serde_json::Value>;

/// Payload for creating a data asset.
///
/// The two submission paths share this one downstream contract; the
/// API layer turns it into either a multipart bundle or a JSON body.
#[derive(Debug, Clone)]
pub enum UploadPayload {
    /// A spreadsheet export forwarded opaquely to the backend.
    File {
        /// Owning district slug.
        district: String,
        /// Original file name, preserved for the backend.
        file_name: String,
        /// Raw file contents.
        bytes: Vec<u8>,
    },
    /// Rows parsed client-side from pasted tabular text.
    Clipboard {
        /// Owning district slug.
        district: String,
        /// Parsed rows; field names come from the pasted header line.
        rows: Vec<ClipboardRow>,
    },
}

/// Status of the singleton per-deployment refresh job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RefreshStatus {
    /// No work in progress.
    Idle,
    /// Snapshot regeneration in progress.
    Running,
    /// Last run failed.
    Failed,
    /// Last run completed.
    Completed,
    /// Any status value this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// A server-side batch job that regenerates district snapshots.
///
/// Created by the trigger call, re-fetched by the client, never mutated
/// client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshJob {
    /// Job identifier.
    pub id: String,
    /// Current job status.
    pub status: RefreshStatus,
    /// When the job started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the job finished, if it has.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Free-form note from the backend (e.g. failure detail).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The account record behind an officer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUser {
    /// User identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
}

/// Authenticated officer identity plus role.
///
/// Fetched once per token and discarded on logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerProfile {
    /// Profile identifier.
    pub id: i64,
    /// Role label (e.g. "analyst", "commander").
    pub role: String,
    /// Underlying account record.
    pub user: AccountUser,
    /// Districts this officer may access.
    #[serde(default)]
    pub districts: Vec<District>,
}

/// A police beat within a district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    /// Beat identifier.
    pub id: i64,
    /// Beat code as used in incident data (e.g. "E1").
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// A police district; subdivides into beats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    /// District identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug used in analytics endpoints.
    pub slug: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Beats within this district.
    #[serde(default)]
    pub beats: Vec<Beat>,
}

/// Outbound payload for requesting dashboard access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRequest {
    /// Applicant email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Applicant organization, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Free-form justification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Requested district slug, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

/// The two boundary layers used by the GIS panel.
///
/// Not district-specific; fetched once per dashboard load and cached
/// only in view state.
#[derive(Debug, Clone)]
pub struct GeoBundle {
    /// District boundary polygons.
    pub districts: geojson::FeatureCollection,
    /// Beat boundary polygons.
    pub beats: geojson::FeatureCollection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_missing_subpayloads_deserialize_empty() {
        let snapshot: AnalyticsSnapshot = serde_json::from_value(serde_json::json!({
            "id": "snap-1",
            "generated_at": "2024-03-01T12:00:00Z"
        }))
        .unwrap();
        assert!(snapshot.eda_payload.is_empty());
        assert!(snapshot.multivariate_payload.beat_vs_weekday.is_empty());
        assert!(snapshot.ml_payload.models.is_empty());
        assert!(snapshot.anomalies_payload.anomalies.is_empty());
    }

    #[test]
    fn column_metrics_optional_fields() {
        let metrics: ColumnMetrics = serde_json::from_value(serde_json::json!({
            "dtype": "object",
            "non_null": 120,
            "null_pct": 4.5,
            "unique": 17
        }))
        .unwrap();
        assert!(metrics.stats.is_none());
        assert!(metrics.histogram.is_none());
        assert!(metrics.top_values.is_none());
    }

    #[test]
    fn anomaly_record_uses_wire_field_names() {
        let record: AnomalyRecord = serde_json::from_value(serde_json::json!({
            "Case Number": "24-001234",
            "Date/Time Occurred": "2024-02-10 23:15",
            "Beats": "E2",
            "Crime_Category": "Violent",
            "anomaly_score": -0.412
        }))
        .unwrap();
        assert_eq!(record.case_number, "24-001234");
        assert_eq!(record.beat, "E2");
        assert!((record.anomaly_score - -0.412).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_statuses_do_not_fail() {
        let upload: UploadAsset = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "district": "east",
            "status": "quarantined",
            "row_count": 10,
            "created_at": "2024-03-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(upload.status, UploadStatus::Unknown);

        let job: RefreshJob = serde_json::from_value(serde_json::json!({
            "id": "j1",
            "status": "rebalancing"
        }))
        .unwrap();
        assert_eq!(job.status, RefreshStatus::Unknown);
    }

    #[test]
    fn status_display_matches_wire_values() {
        assert_eq!(RefreshStatus::Running.to_string(), "running");
        assert_eq!(UploadStatus::Processed.to_string(), "processed");
    }
}
