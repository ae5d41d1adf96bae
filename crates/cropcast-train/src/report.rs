//! Console report of a training run.

use cropcast_model::{ColumnSummary, Dataset, Evaluation, FeatureImportance, RawRecord};

const BAR_WIDTH: usize = 40;

fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "NaN".to_string(), T::to_string)
}

fn format_record(r: &RawRecord) -> String {
    [
        cell(&r.ndvi),
        cell(&r.temp_min),
        cell(&r.temp_max),
        cell(&r.humidity_min),
        cell(&r.humidity_max),
        cell(&r.rainfall_mm),
        cell(&r.soil_moisture),
        cell(&r.crop_type),
        cell(&r.cloud_condition),
        cell(&r.month),
        cell(&r.crop_yield),
    ]
    .join(", ")
}

pub fn print_exploration(dataset: &Dataset) {
    let (rows, cols) = dataset.shape();
    println!("Dataset shape: ({rows}, {cols})");

    println!("\nFirst few rows:");
    println!("{}", cropcast_model::COLUMNS.join(", "));
    for record in dataset.head(5) {
        println!("{}", format_record(record));
    }

    println!("\nMissing values:");
    for (column, missing) in dataset.missing_counts() {
        println!("{column:<16} {missing}");
    }

    println!("\nDescriptive statistics:");
    print_summary(&dataset.describe());
}

fn print_summary(summary: &[ColumnSummary]) {
    println!(
        "{:<16} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for s in summary {
        println!(
            "{:<16} {:>7} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            s.column, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
        );
    }
}

pub fn print_performance(evaluation: &Evaluation) {
    println!("\nModel Performance:");
    println!("Root Mean Squared Error: {:.4}", evaluation.rmse);
    println!("R-squared: {:.4}", evaluation.r2);
}

pub fn print_importances(importances: &[FeatureImportance]) {
    println!("\nFeature Importances:");
    for f in importances {
        println!("{}: {:.4}", f.feature, f.importance);
    }

    println!("\nFeature importance chart:");
    for (feature, bar) in importance_bars(importances) {
        println!("{feature:<32} {bar}");
    }
}

/// Text bars scaled so the largest positive importance fills the width.
fn importance_bars(importances: &[FeatureImportance]) -> Vec<(&str, String)> {
    let max = importances.iter().map(|f| f.importance).fold(0.0_f64, f64::max);
    importances
        .iter()
        .map(|f| {
            let len = if max > 0.0 {
                ((f.importance.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            (f.feature.as_str(), "#".repeat(len))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fi(feature: &str, importance: f64) -> FeatureImportance {
        FeatureImportance { feature: feature.to_string(), importance }
    }

    #[test]
    fn test_importance_bars_scale() {
        let importances = [fi("ndvi", 0.8), fi("rainfall_mm", 0.2), fi("season_Winter", -0.01)];
        let bars = importance_bars(&importances);
        assert_eq!(bars[0].1.len(), BAR_WIDTH);
        assert_eq!(bars[1].1.len(), BAR_WIDTH / 4);
        assert!(bars[2].1.is_empty());
    }

    #[test]
    fn test_format_record_marks_missing() {
        let record = RawRecord { ndvi: Some(0.5), month: Some(6), ..Default::default() };
        let line = format_record(&record);
        assert!(line.starts_with("0.5, NaN"));
        assert!(line.contains(", 6, NaN"));
    }
}
