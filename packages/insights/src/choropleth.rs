//! Beat-intensity aggregation and choropleth property derivation.
//!
//! Turns the `beat_vs_weekday` cross-tabulation into a per-beat scalar
//! intensity and stamps it onto a structural copy of the beat boundary
//! `FeatureCollection` for map coloring. The source collection is
//! never mutated.

use std::collections::BTreeMap;

use district_desk_api_models::CrosstabRow;
use geojson::FeatureCollection;

/// Field holding the beat identifier in `beat_vs_weekday` rows.
pub const BEAT_KEY: &str = "Beats";

/// Boundary feature property keys checked for the beat code, in
/// priority order; the first one present wins.
pub const BEAT_PROPERTY_KEYS: [&str; 3] = ["DISTRICT_B", "BEAT", "DISTRICT"];

/// Derived property attached to each boundary feature.
pub const INTENSITY_PROPERTY: &str = "intensity";

/// Coerces a loosely-typed cell into a number the way the upstream
/// data pipeline does: numbers pass through, numeric strings parse,
/// empty strings and nulls count as zero, booleans as 0/1, and
/// anything else is `NaN`.
#[must_use]
pub fn coerce_number(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Null => 0.0,
        serde_json::Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => f64::NAN,
    }
}

/// Sums every non-identifier field of each `beat_vs_weekday` row into
/// a scalar intensity keyed by beat code.
///
/// Rows with the same beat code sum together. A malformed cell makes
/// that beat's total `NaN` without affecting any other beat, and
/// nothing here can panic. Rows without a usable beat identifier are
/// skipped. An empty input yields an empty map.
#[must_use]
pub fn beat_intensity(rows: &[CrosstabRow]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for row in rows {
        let Some(code) = row.get(BEAT_KEY).and_then(stringify_code) else {
            log::debug!("Skipping beat_vs_weekday row without a '{BEAT_KEY}' field");
            continue;
        };

        let total: f64 = row
            .iter()
            .filter(|(key, _)| key.as_str() != BEAT_KEY)
            .map(|(_, value)| coerce_number(value))
            .sum();

        *totals.entry(code).or_insert(0.0) += total;
    }

    totals
}

/// Produces a choropleth-ready copy of the beat boundary collection:
/// every feature gains an [`INTENSITY_PROPERTY`] holding its beat's
/// intensity, defaulting to 0 when the beat code matches no row. The
/// beat code is resolved from the first property present among
/// [`BEAT_PROPERTY_KEYS`].
///
/// A `NaN` intensity has no JSON number representation and is attached
/// as `null`, confining the poisoned value to its own feature.
#[must_use]
pub fn attach_intensity(
    beats: &FeatureCollection,
    totals: &BTreeMap<String, f64>,
) -> FeatureCollection {
    let features = beats
        .features
        .iter()
        .map(|feature| {
            let mut feature = feature.clone();
            let code = resolve_beat_code(&feature);
            let intensity = code
                .and_then(|code| totals.get(&code).copied())
                .unwrap_or(0.0);
            feature
                .properties
                .get_or_insert_with(serde_json::Map::new)
                .insert(INTENSITY_PROPERTY.to_string(), serde_json::Value::from(intensity));
            feature
        })
        .collect();

    FeatureCollection {
        bbox: beats.bbox.clone(),
        features,
        foreign_members: beats.foreign_members.clone(),
    }
}

/// Resolves a boundary feature's beat code from its properties.
#[must_use]
pub fn resolve_beat_code(feature: &geojson::Feature) -> Option<String> {
    let properties = feature.properties.as_ref()?;
    BEAT_PROPERTY_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(stringify_code))
}

fn stringify_code(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
