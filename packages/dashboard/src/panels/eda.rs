//! EDA panel: per-column descriptive statistics.

use console::style;
use district_desk_api_models::ColumnMetrics;
use district_desk_insights::{
    HISTOGRAM_MAX_HEIGHT, TOP_VALUE_MAX_WIDTH, scale_histogram, top_value_width,
};

use crate::panels::bar;

/// Renders the metrics for one column.
pub fn render_column(name: &str, metrics: &ColumnMetrics) {
    println!();
    println!("{}", style(name).bold().underlined());
    println!(
        "  Type {}    Missing {:.2}%    Unique {}",
        style(&metrics.dtype).bold(),
        metrics.null_pct,
        style(metrics.unique).bold(),
    );

    if let Some(stats) = &metrics.stats {
        println!();
        println!("{}", style("Stats").bold());
        for (label, value) in stats {
            println!("  {label:<12} {value:.2}");
        }
    }

    if let Some(top_values) = &metrics.top_values {
        println!();
        println!("{}", style("Top values").bold());
        for value in top_values {
            let width = top_value_width(value.count, metrics.non_null);
            println!(
                "  {:<24} {:<bar_width$}  {}",
                truncate(&value.label, 24),
                bar(width, TOP_VALUE_MAX_WIDTH),
                value.count,
                bar_width = crate::panels::BAR_WIDTH,
            );
        }
    }

    if let Some(histogram) = &metrics.histogram {
        println!();
        println!("{}", style("Histogram").bold());
        let heights = scale_histogram(&histogram.counts);
        for (idx, height) in heights.iter().enumerate() {
            let edge = histogram
                .bins
                .get(idx)
                .map_or_else(|| "?".to_string(), |edge| format!("{edge:.1}"));
            println!(
                "  {:>12}  {:<bar_width$}  {}",
                edge,
                bar(*height, HISTOGRAM_MAX_HEIGHT),
                histogram.counts.get(idx).copied().unwrap_or(0),
                bar_width = crate::panels::BAR_WIDTH,
            );
        }
    }
}

fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let head: String = label.chars().take(max.saturating_sub(1)).collect();
        format!("{head}\u{2026}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_labels() {
        assert_eq!(truncate("short", 24), "short");
        let long = "a".repeat(30);
        let out = truncate(&long, 24);
        assert_eq!(out.chars().count(), 24);
        assert!(out.ends_with('\u{2026}'));
    }
}
