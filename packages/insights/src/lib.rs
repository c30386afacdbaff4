#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derives view-ready aggregates from a fetched analytics snapshot.
//!
//! Everything here is a pure function of already-fetched payloads.
//! Snapshot shape legitimately varies across districts and time, so
//! every derivation tolerates missing or empty upstream collections by
//! producing an empty or zero-valued result — none of them can fail.

pub mod choropleth;

use std::collections::BTreeMap;

use district_desk_api_models::{AnalyticsSnapshot, ColumnMetrics, CrosstabRow};

/// Column keys checked for the violent-incident indicator, in priority
/// order: the named crime-category column, then the binary ML target.
pub const VIOLENT_INDICATOR_COLUMNS: [&str; 2] = ["Violent_Crime_excl09A", "target_binary"];

/// `top_values` labels that count as violent in the indicator column.
pub const VIOLENT_LABELS: [&str; 2] = ["1", "Violent"];

/// Maximum scaled histogram bar height.
pub const HISTOGRAM_MAX_HEIGHT: f64 = 120.0;

/// Maximum scaled top-value bar width.
pub const TOP_VALUE_MAX_WIDTH: f64 = 100.0;

/// Key of the hour field in `hourly_breakdown` rows.
pub const HOUR_KEY: &str = "Hour";

/// Aggregates derived once per snapshot and reused by the panels.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    /// Share of incidents classified violent, in [0, 1]. `None` when
    /// the snapshot carries no violent-indicator column at all.
    pub violent_share: Option<f64>,
}

impl Insights {
    /// Derives all insights from a snapshot. Deterministic: the same
    /// snapshot always produces the same value, so callers compute
    /// this once per fetch and cache it alongside the snapshot.
    #[must_use]
    pub fn derive(snapshot: &AnalyticsSnapshot) -> Self {
        Self {
            violent_share: violent_share(&snapshot.eda_payload),
        }
    }
}

/// Derives the violent-incident share from the EDA payload.
///
/// Looks up the indicator column under the well-known keys in
/// [`VIOLENT_INDICATOR_COLUMNS`]; with no such column there is nothing
/// to derive and the result is `None`. With a column, the share is the
/// count of the first `top_values` entry labeled `"1"` or `"Violent"`
/// divided by the column's non-null count (floored at 1 so an empty
/// column yields 0 rather than a division by zero). A column without a
/// matching label yields 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn violent_share(eda: &BTreeMap<String, ColumnMetrics>) -> Option<f64> {
    let column = VIOLENT_INDICATOR_COLUMNS.iter().find_map(|key| eda.get(*key))?;

    let count = column
        .top_values
        .as_deref()
        .and_then(|values| {
            values
                .iter()
                .find(|value| VIOLENT_LABELS.contains(&value.label.as_str()))
        })
        .map_or(0, |value| value.count);

    Some(count as f64 / column.non_null.max(1) as f64)
}

/// Scales histogram counts into bar heights in
/// `[0, HISTOGRAM_MAX_HEIGHT]`, proportional to the maximum count.
///
/// All-zero (or empty) counts produce all-zero heights — never `NaN`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scale_histogram(counts: &[u64]) -> Vec<f64> {
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|&count| count as f64 / max as f64 * HISTOGRAM_MAX_HEIGHT)
        .collect()
}

/// Scales one top-value count into a bar width in
/// `[0, TOP_VALUE_MAX_WIDTH]`, proportional to the column's non-null
/// total (floored at 1).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn top_value_width(count: u64, non_null: u64) -> f64 {
    let width = count as f64 / non_null.max(1) as f64 * TOP_VALUE_MAX_WIDTH;
    width.min(TOP_VALUE_MAX_WIDTH)
}

/// Discovers the stacked chart series for the hourly breakdown: the
/// key set of the first row, excluding the hour field. An empty input
/// yields no series.
#[must_use]
pub fn hourly_series_keys(rows: &[CrosstabRow]) -> Vec<String> {
    rows.first().map_or_else(Vec::new, |row| {
        row.keys().filter(|key| *key != HOUR_KEY).cloned().collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use district_desk_api_models::TopValue;

    fn column(non_null: u64, top_values: Option<Vec<TopValue>>) -> ColumnMetrics {
        ColumnMetrics {
            dtype: "int64".to_string(),
            non_null,
            null_pct: 0.0,
            unique: 2,
            stats: None,
            histogram: None,
            top_values,
        }
    }

    fn eda_with(key: &str, metrics: ColumnMetrics) -> BTreeMap<String, ColumnMetrics> {
        let mut eda = BTreeMap::new();
        eda.insert(key.to_string(), metrics);
        eda
    }

    #[test]
    fn violent_share_none_without_indicator_column() {
        let eda = eda_with("Beats", column(100, None));
        assert_eq!(violent_share(&eda), None);
        assert_eq!(violent_share(&BTreeMap::new()), None);
    }

    #[test]
    fn violent_share_matches_label_one() {
        let eda = eda_with(
            "Violent_Crime_excl09A",
            column(
                200,
                Some(vec![
                    TopValue {
                        label: "0".to_string(),
                        count: 160,
                    },
                    TopValue {
                        label: "1".to_string(),
                        count: 40,
                    },
                ]),
            ),
        );
        let share = violent_share(&eda).unwrap();
        assert!((share - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn violent_share_matches_label_violent_on_fallback_column() {
        let eda = eda_with(
            "target_binary",
            column(
                50,
                Some(vec![TopValue {
                    label: "Violent".to_string(),
                    count: 10,
                }]),
            ),
        );
        let share = violent_share(&eda).unwrap();
        assert!((share - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn violent_share_zero_when_label_absent() {
        let eda = eda_with(
            "Violent_Crime_excl09A",
            column(
                100,
                Some(vec![TopValue {
                    label: "Property".to_string(),
                    count: 60,
                }]),
            ),
        );
        assert_eq!(violent_share(&eda), Some(0.0));
    }

    #[test]
    fn violent_share_zero_when_top_values_missing() {
        let eda = eda_with("Violent_Crime_excl09A", column(100, None));
        assert_eq!(violent_share(&eda), Some(0.0));
    }

    #[test]
    fn violent_share_floors_divisor_at_one() {
        let eda = eda_with(
            "Violent_Crime_excl09A",
            column(
                0,
                Some(vec![TopValue {
                    label: "1".to_string(),
                    count: 0,
                }]),
            ),
        );
        assert_eq!(violent_share(&eda), Some(0.0));
    }

    #[test]
    fn histogram_heights_bounded_and_proportional() {
        let heights = scale_histogram(&[10, 5, 0, 20]);
        assert!((heights[0] - 60.0).abs() < f64::EPSILON);
        assert!((heights[1] - 30.0).abs() < f64::EPSILON);
        assert!((heights[2] - 0.0).abs() < f64::EPSILON);
        assert!((heights[3] - 120.0).abs() < f64::EPSILON);
        assert!(heights.iter().all(|h| (0.0..=HISTOGRAM_MAX_HEIGHT).contains(h)));
    }

    #[test]
    fn histogram_all_zero_counts_never_nan() {
        let heights = scale_histogram(&[0, 0, 0]);
        assert_eq!(heights, vec![0.0, 0.0, 0.0]);
        assert!(heights.iter().all(|h| !h.is_nan()));
        assert!(scale_histogram(&[]).is_empty());
    }

    #[test]
    fn top_value_width_guards_zero_non_null() {
        assert!((top_value_width(0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((top_value_width(40, 200) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hourly_keys_from_first_row_exclude_hour() {
        let rows: Vec<CrosstabRow> = vec![
            serde_json::from_value(serde_json::json!({
                "Hour": 0, "Property": 3, "Violent": 1
            }))
            .unwrap(),
            serde_json::from_value(serde_json::json!({
                "Hour": 1, "Property": 2, "Violent": 0, "Other": 5
            }))
            .unwrap(),
        ];
        let keys = hourly_series_keys(&rows);
        assert_eq!(keys, vec!["Property".to_string(), "Violent".to_string()]);
    }

    #[test]
    fn hourly_keys_empty_input_yields_no_series() {
        assert!(hourly_series_keys(&[]).is_empty());
    }
}
