//! GIS panel: per-beat intensity derived for the map layers.
//!
//! The choropleth feature collection produced here is exactly what a
//! map front end would color by; the terminal panel summarizes it as
//! a table. Tile rendering itself is out of scope.

use console::style;
use district_desk_insights::choropleth::{
    INTENSITY_PROPERTY, attach_intensity, beat_intensity, resolve_beat_code,
};
use geojson::FeatureCollection;

use crate::DistrictView;
use crate::panels::bar;

/// Derives the choropleth-ready beat collection for a view: each
/// feature carries an `intensity` property, 0 for beats with no data.
#[must_use]
pub fn choropleth(view: &DistrictView) -> FeatureCollection {
    let totals = beat_intensity(&view.snapshot.multivariate_payload.beat_vs_weekday);
    attach_intensity(&view.geo.beats, &totals)
}

/// Renders the per-beat intensity table.
pub fn render(view: &DistrictView) {
    let derived = choropleth(view);

    println!();
    println!(
        "{}",
        style(format!("{} \u{2014} incidents by beat", view.slug.to_uppercase()))
            .bold()
            .underlined()
    );
    println!(
        "  {} district boundaries, {} beat polygons",
        view.geo.districts.features.len(),
        derived.features.len(),
    );

    if derived.features.is_empty() {
        println!("  No beat boundaries available.");
        return;
    }

    let max = derived
        .features
        .iter()
        .filter_map(feature_intensity)
        .filter(|intensity| intensity.is_finite())
        .fold(0.0_f64, f64::max);

    println!();
    for feature in &derived.features {
        let code =
            resolve_beat_code(feature).unwrap_or_else(|| "\u{2014}".to_string());
        match feature_intensity(feature) {
            Some(intensity) => println!(
                "  {:<8} {:<width$}  {:.0}",
                code,
                bar(intensity, max),
                intensity,
                width = crate::panels::BAR_WIDTH,
            ),
            // NaN intensity was attached as null; flag it rather than
            // hiding the beat.
            None => println!("  {code:<8} {}", style("unparseable counts").dim()),
        }
    }
}

fn feature_intensity(feature: &geojson::Feature) -> Option<f64> {
    feature
        .properties
        .as_ref()?
        .get(INTENSITY_PROPERTY)?
        .as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use district_desk_api_models::{AnalyticsSnapshot, GeoBundle};

    fn view_with(beat_vs_weekday: serde_json::Value) -> DistrictView {
        let snapshot: AnalyticsSnapshot = serde_json::from_value(serde_json::json!({
            "id": "snap-1",
            "multivariate_payload": { "beat_vs_weekday": beat_vs_weekday },
            "generated_at": "2024-03-01T12:00:00Z"
        }))
        .unwrap();

        let beats: FeatureCollection = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-97.1, 32.73] },
                    "properties": { "BEAT": "E1" }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-97.2, 32.74] },
                    "properties": { "BEAT": "E2" }
                }
            ]
        }))
        .unwrap();

        DistrictView::assemble(
            "east".to_string(),
            snapshot,
            Vec::new(),
            Vec::new(),
            None,
            GeoBundle {
                districts: FeatureCollection {
                    bbox: None,
                    features: Vec::new(),
                    foreign_members: None,
                },
                beats,
            },
        )
    }

    #[test]
    fn empty_crosstab_yields_zero_intensity_everywhere() {
        let derived = choropleth(&view_with(serde_json::json!([])));
        for feature in &derived.features {
            assert_eq!(feature_intensity(feature), Some(0.0));
        }
    }

    #[test]
    fn intensities_land_on_matching_beats() {
        let derived = choropleth(&view_with(serde_json::json!([
            { "Beats": "E1", "Mon": 4, "Tue": 5 }
        ])));
        assert_eq!(feature_intensity(&derived.features[0]), Some(9.0));
        assert_eq!(feature_intensity(&derived.features[1]), Some(0.0));
    }
}
