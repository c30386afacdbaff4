#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District dashboard composition.
//!
//! [`load_district`] fan-outs the independent data fetches for one
//! district, joins them all before anything renders (any single
//! failure fails the whole load — there is no partial-success
//! rendering), and assembles a [`DistrictView`] with the derived
//! insights computed once per load. The interactive tab loop in
//! [`interactive`] switches between the five presentation panels
//! without reloading.

pub mod interactive;
pub mod panels;

use district_desk_api::{ApiClient, ApiError};
use district_desk_api_models::{
    AnalyticsSnapshot, GeoBundle, ModelResult, RefreshJob, UploadAsset,
};
use district_desk_ingest::IngestError;
use district_desk_insights::Insights;
use district_desk_session::SessionError;
use thiserror::Error;

/// Errors surfaced by the dashboard loop.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A backend call failed; the message is the server's text.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session login/persistence failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Upload intake failed before anything was sent.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A terminal prompt failed.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// The five presentation panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Headline stats, trends, and the anomaly board.
    Overview,
    /// Per-column exploratory statistics.
    Eda,
    /// Trained model metrics and feature importances.
    MlLab,
    /// Upload intake and refresh control.
    UploadCenter,
    /// Per-beat intensity derived for the map layers.
    Gis,
}

impl Tab {
    /// All tabs, in display order.
    pub const ALL: &[Self] = &[
        Self::Overview,
        Self::Eda,
        Self::MlLab,
        Self::UploadCenter,
        Self::Gis,
    ];

    /// Display label for the tab selector.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Eda => "EDA",
            Self::MlLab => "ML Lab",
            Self::UploadCenter => "Upload Center",
            Self::Gis => "GIS",
        }
    }
}

/// Everything one district's dashboard renders from.
///
/// All fields are fetched fresh per load; [`Self::insights`] is
/// derived once at assembly and reused by every panel until the
/// snapshot is re-fetched.
pub struct DistrictView {
    /// District slug this view was loaded for.
    pub slug: String,
    /// The analytics snapshot.
    pub snapshot: AnalyticsSnapshot,
    /// Freshly-fetched model results (may be empty).
    pub model_results: Vec<ModelResult>,
    /// Upload log, newest first (server ordering).
    pub uploads: Vec<UploadAsset>,
    /// Latest refresh job, if any exist yet.
    pub refresh_job: Option<RefreshJob>,
    /// Boundary layers for the GIS panel.
    pub geo: GeoBundle,
    /// Aggregates derived from the snapshot.
    pub insights: Insights,
}

impl DistrictView {
    /// Assembles a view from fetched parts, deriving the insights.
    #[must_use]
    pub fn assemble(
        slug: String,
        snapshot: AnalyticsSnapshot,
        model_results: Vec<ModelResult>,
        uploads: Vec<UploadAsset>,
        refresh_job: Option<RefreshJob>,
        geo: GeoBundle,
    ) -> Self {
        let insights = Insights::derive(&snapshot);
        Self {
            slug,
            snapshot,
            model_results,
            uploads,
            refresh_job,
            geo,
            insights,
        }
    }

    /// Models to render: the freshly-fetched results, falling back to
    /// the snapshot's embedded models when the fetch came back empty.
    #[must_use]
    pub fn models(&self) -> &[ModelResult] {
        if self.model_results.is_empty() {
            &self.snapshot.ml_payload.models
        } else {
            &self.model_results
        }
    }

    /// The most recent upload, if any.
    #[must_use]
    pub fn latest_upload(&self) -> Option<&UploadAsset> {
        self.uploads.first()
    }
}

/// Fetches all data for one district and assembles the view.
///
/// The four district-scoped requests go out concurrently, then the
/// two geo layers; each group joins before proceeding. A hung request
/// leaves the caller waiting — no client-side timeout or retry is
/// applied at this boundary.
///
/// # Errors
///
/// Returns the first [`ApiError`] from any of the six requests; no
/// partial view is produced.
pub async fn load_district(
    client: &ApiClient,
    token: &str,
    slug: &str,
) -> Result<DistrictView, ApiError> {
    let (snapshot, uploads, refresh_job, model_results) = futures::try_join!(
        district_desk_api::analytics::fetch_snapshot(client, token, slug),
        district_desk_api::uploads::list_uploads(client, token),
        district_desk_api::uploads::fetch_refresh_status(client, token),
        district_desk_api::analytics::fetch_model_results(client, token, slug),
    )?;

    let (districts, beats) = futures::try_join!(
        district_desk_api::geo::fetch_district_geo(client),
        district_desk_api::geo::fetch_beat_geo(client),
    )?;

    log::debug!(
        "Loaded district '{slug}': {} EDA columns, {} uploads, {} models",
        snapshot.eda_payload.len(),
        uploads.len(),
        model_results.len(),
    );

    Ok(DistrictView::assemble(
        slug.to_string(),
        snapshot,
        model_results,
        uploads,
        refresh_job,
        GeoBundle { districts, beats },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use district_desk_api_models::{MlPayload, ModelMetrics};

    fn snapshot_with_models(models: Vec<ModelResult>) -> AnalyticsSnapshot {
        serde_json::from_value::<AnalyticsSnapshot>(serde_json::json!({
            "id": "snap-1",
            "generated_at": "2024-03-01T12:00:00Z"
        }))
        .map(|mut snapshot| {
            snapshot.ml_payload = MlPayload {
                models,
                ..MlPayload::default()
            };
            snapshot
        })
        .unwrap()
    }

    fn model(name: &str) -> ModelResult {
        ModelResult {
            name: name.to_string(),
            tuned: false,
            parameters: serde_json::Value::Null,
            metrics: ModelMetrics::default(),
            feature_importances: Vec::new(),
        }
    }

    fn empty_geo() -> GeoBundle {
        GeoBundle {
            districts: geojson::FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
            beats: geojson::FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
        }
    }

    #[test]
    fn models_prefers_fetched_results() {
        let view = DistrictView::assemble(
            "east".to_string(),
            snapshot_with_models(vec![model("embedded")]),
            vec![model("fetched")],
            Vec::new(),
            None,
            empty_geo(),
        );
        assert_eq!(view.models()[0].name, "fetched");
    }

    #[test]
    fn models_falls_back_to_snapshot_payload() {
        let view = DistrictView::assemble(
            "east".to_string(),
            snapshot_with_models(vec![model("embedded")]),
            Vec::new(),
            Vec::new(),
            None,
            empty_geo(),
        );
        assert_eq!(view.models()[0].name, "embedded");
    }

    #[test]
    fn latest_upload_is_first_entry() {
        let uploads: Vec<UploadAsset> = serde_json::from_value(serde_json::json!([
            {
                "id": "a2",
                "district": "east",
                "status": "queued",
                "row_count": 5,
                "created_at": "2024-03-02T08:00:00Z"
            },
            {
                "id": "a1",
                "district": "east",
                "status": "processed",
                "row_count": 100,
                "created_at": "2024-03-01T08:00:00Z"
            }
        ]))
        .unwrap();

        let view = DistrictView::assemble(
            "east".to_string(),
            snapshot_with_models(Vec::new()),
            Vec::new(),
            uploads,
            None,
            empty_geo(),
        );
        assert_eq!(view.latest_upload().unwrap().id, "a2");
    }

    #[test]
    fn insights_derived_at_assembly() {
        let snapshot: AnalyticsSnapshot = serde_json::from_value(serde_json::json!({
            "id": "snap-1",
            "eda_payload": {
                "Violent_Crime_excl09A": {
                    "dtype": "int64",
                    "non_null": 200,
                    "null_pct": 0.0,
                    "unique": 2,
                    "top_values": [{ "label": "1", "count": 40 }]
                }
            },
            "generated_at": "2024-03-01T12:00:00Z"
        }))
        .unwrap();

        let view = DistrictView::assemble(
            "east".to_string(),
            snapshot,
            Vec::new(),
            Vec::new(),
            None,
            empty_geo(),
        );
        let share = view.insights.violent_share.unwrap();
        assert!((share - 0.2).abs() < f64::EPSILON);
    }
}
