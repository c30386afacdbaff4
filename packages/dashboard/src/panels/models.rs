//! ML Lab panel: trained model metrics and feature importances.

use console::style;
use district_desk_api_models::ModelResult;

/// How many feature importances each model card shows. The backend
/// pre-sorts descending; the panel slices and never re-sorts.
pub const TOP_FEATURES: usize = 5;

/// Renders one card per model variant.
pub fn render(models: &[ModelResult]) {
    println!();
    println!("{}", style("ML Lab").bold().underlined());

    if models.is_empty() {
        println!("  No trained models yet. Upload data and trigger a refresh.");
        return;
    }

    for model in models {
        let badge = if model.tuned { "Tuned" } else { "Baseline" };
        println!();
        println!("  {} {}", style(badge).dim(), style(&model.name).bold());

        for (metric, value) in &model.metrics.validation {
            println!("    {metric:<14} {value:.3}");
        }

        if !model.feature_importances.is_empty() {
            println!("    {}", style("Top features").dim());
            for feature in model.feature_importances.iter().take(TOP_FEATURES) {
                println!("      {:<28} {:.3}", feature.feature, feature.importance);
            }
        }
    }
}
