//! Overview panel: headline tiles, trends, and the anomaly board.

use console::style;
use district_desk_insights::{Insights, hourly_series_keys};

use crate::DistrictView;
use crate::panels::{bar, cell};

/// Headline label for the violent-share tile.
///
/// A share of zero renders the same as a missing indicator column —
/// the backend may simply not have recomputed the snapshot yet.
#[must_use]
pub fn violent_share_label(insights: &Insights) -> String {
    match insights.violent_share {
        Some(share) if share > 0.0 => format!("{:.1}%", share * 100.0),
        _ => "Calculating...".to_string(),
    }
}

/// Renders the overview panel.
pub fn render(view: &DistrictView) {
    let snapshot = &view.snapshot;

    println!();
    println!("{}", style("Overview").bold().underlined());
    println!();

    let rows_label = view
        .latest_upload()
        .map_or_else(|| "\u{2014}".to_string(), |upload| upload.row_count.to_string());
    println!("  Records in latest upload   {}", style(rows_label).bold());
    println!(
        "  Violent share              {}",
        style(violent_share_label(&view.insights)).bold()
    );
    println!(
        "  Features analyzed          {}",
        style(snapshot.eda_payload.len()).bold()
    );
    println!(
        "  Snapshot generated         {}",
        style(snapshot.generated_at.format("%Y-%m-%d")).bold()
    );

    render_monthly(view);
    render_hourly(view);
    render_anomalies(view);
}

fn render_monthly(view: &DistrictView) {
    let monthly = &view.snapshot.multivariate_payload.monthly_counts;
    if monthly.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Monthly incidents").bold());
    let max = monthly.iter().map(|m| m.count).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    for month in monthly {
        println!(
            "  {:>8}  {:<width$}  {}",
            month.year_month,
            bar(month.count as f64, max as f64),
            month.count,
            width = crate::panels::BAR_WIDTH,
        );
    }
}

fn render_hourly(view: &DistrictView) {
    let hourly = &view.snapshot.multivariate_payload.hourly_breakdown;
    let keys = hourly_series_keys(hourly);
    if keys.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Crime category by hour").bold());
    print!("  {:>4}", "Hour");
    for key in &keys {
        print!("  {key:>12}");
    }
    println!();

    for row in hourly {
        let hour = row
            .get(district_desk_insights::HOUR_KEY)
            .map_or_else(|| "\u{2014}".to_string(), cell);
        print!("  {hour:>4}");
        for key in &keys {
            let value = row.get(key).map_or_else(|| "\u{2014}".to_string(), cell);
            print!("  {value:>12}");
        }
        println!();
    }
}

fn render_anomalies(view: &DistrictView) {
    let anomalies = &view.snapshot.anomalies_payload.anomalies;
    if anomalies.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Anomaly board").bold());
    println!(
        "  {:<14}  {:<18}  {:<6}  {:<16}  {:>7}",
        "Case", "Date/Time", "Beat", "Category", "Score"
    );
    for anomaly in anomalies {
        println!(
            "  {:<14}  {:<18}  {:<6}  {:<16}  {:>7.3}",
            anomaly.case_number,
            anomaly.occurred_at,
            anomaly.beat,
            anomaly.category,
            anomaly.anomaly_score,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_share_to_one_decimal() {
        let insights = Insights {
            violent_share: Some(0.2),
        };
        assert_eq!(violent_share_label(&insights), "20.0%");
    }

    #[test]
    fn zero_and_missing_share_both_show_placeholder() {
        assert_eq!(
            violent_share_label(&Insights {
                violent_share: Some(0.0)
            }),
            "Calculating..."
        );
        assert_eq!(
            violent_share_label(&Insights {
                violent_share: None
            }),
            "Calculating..."
        );
    }
}
