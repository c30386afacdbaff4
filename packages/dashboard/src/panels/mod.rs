//! The five presentation panels.
//!
//! Panels render already-derived data to the terminal; they contain no
//! business logic beyond formatting. Anything worth testing lives in
//! the insights layer or in the small pure helpers exposed here.

pub mod eda;
pub mod gis;
pub mod models;
pub mod overview;
pub mod uploads;

/// Width, in glyphs, of the widest proportional bar a panel draws.
pub(crate) const BAR_WIDTH: usize = 40;

/// Renders a proportional bar: `scaled / scale_max` of [`BAR_WIDTH`]
/// filled glyphs. Out-of-range and non-finite inputs clamp to empty.
pub(crate) fn bar(scaled: f64, scale_max: f64) -> String {
    if !scaled.is_finite() || scaled <= 0.0 || scale_max <= 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((scaled / scale_max) * BAR_WIDTH as f64).round().min(BAR_WIDTH as f64) as usize;
    "\u{2588}".repeat(filled)
}

/// Renders a loosely-typed cross-tabulation cell for table output.
pub(crate) fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "\u{2014}".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_proportional_and_clamped() {
        assert_eq!(bar(120.0, 120.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(60.0, 120.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(0.0, 120.0), "");
        assert_eq!(bar(f64::NAN, 120.0), "");
        assert_eq!(bar(10.0, 0.0), "");
    }

    #[test]
    fn cell_formats_strings_bare() {
        assert_eq!(cell(&serde_json::json!("E1")), "E1");
        assert_eq!(cell(&serde_json::json!(3)), "3");
        assert_eq!(cell(&serde_json::Value::Null), "\u{2014}");
    }
}
