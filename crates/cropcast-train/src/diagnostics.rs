//! Diagnostic CSVs written next to the artifact: feature importances and
//! actual-vs-predicted yields on the held-out split.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cropcast_model::{FeatureImportance, TestPrediction};
use serde::Serialize;

pub const IMPORTANCES_FILE: &str = "feature_importances.csv";
pub const PREDICTIONS_FILE: &str = "predictions.csv";

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes both CSVs into `dir`, creating it if needed. Returns the paths written.
pub fn write(
    dir: &Path,
    importances: &[FeatureImportance],
    predictions: &[TestPrediction],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let importances_path = dir.join(IMPORTANCES_FILE);
    write_rows(&importances_path, importances)?;

    let predictions_path = dir.join(PREDICTIONS_FILE);
    write_rows(&predictions_path, predictions)?;

    Ok(vec![importances_path, predictions_path])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_diagnostics() {
        let dir = std::env::temp_dir().join(format!("cropcast-diag-{}", uuid::Uuid::new_v4()));
        let importances = vec![FeatureImportance { feature: "ndvi".into(), importance: 0.5 }];
        let predictions = vec![
            TestPrediction { actual: 4.0, predicted: 3.5 },
            TestPrediction { actual: 5.0, predicted: 5.25 },
        ];

        let paths = write(&dir, &importances, &predictions).unwrap();
        assert_eq!(paths.len(), 2);

        let imp = fs::read_to_string(dir.join(IMPORTANCES_FILE)).unwrap();
        assert_eq!(imp, "feature,importance\nndvi,0.5\n");

        let preds = fs::read_to_string(dir.join(PREDICTIONS_FILE)).unwrap();
        assert_eq!(preds.lines().count(), 3);
        assert!(preds.starts_with("actual,predicted\n"));

        fs::remove_dir_all(&dir).ok();
    }
}
