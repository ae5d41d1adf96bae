//! Column transforms applied before the regressor: standard scaling for
//! numeric features and one-hot encoding for categorical ones.

use std::collections::BTreeSet;

use cropcast_core::{FeatureRow, YieldError, CATEGORICAL_FEATURES, NUMERIC_FEATURES};
use serde::{Deserialize, Serialize};

/// Centers each column on its mean and scales it to unit variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Learns per-column mean and population standard deviation.
    /// Constant columns get a scale of 1.
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, YieldError> {
        let first = rows.first().ok_or(YieldError::EmptyDataset)?;
        let width = first.as_ref().len();
        let n = rows.len() as f64;

        let mut means = vec![0.0; width];
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(YieldError::SchemaMismatch { expected: width, found: row.len() });
            }
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut scales = vec![0.0; width];
        for row in rows {
            for ((s, v), m) in scales.iter_mut().zip(row.as_ref()).zip(&means) {
                *s += (v - m).powi(2);
            }
        }
        for s in scales.iter_mut() {
            let std = (*s / n).sqrt();
            *s = if std > f64::EPSILON { std } else { 1.0 };
        }

        Ok(Self { means, scales })
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }

    /// Appends the scaled row to `out`.
    pub fn transform_into(&self, row: &[f64], out: &mut Vec<f64>) {
        out.extend(
            row.iter()
                .zip(self.means.iter().zip(&self.scales))
                .map(|(v, (m, s))| (v - m) / s),
        );
    }
}

/// One indicator column per category seen during fitting. Unknown
/// categories encode as all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Records the sorted distinct values of every column.
    pub fn fit<R: AsRef<[String]>>(rows: &[R]) -> Result<Self, YieldError> {
        let first = rows.first().ok_or(YieldError::EmptyDataset)?;
        let width = first.as_ref().len();

        let mut seen: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); width];
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(YieldError::SchemaMismatch { expected: width, found: row.len() });
            }
            for (set, v) in seen.iter_mut().zip(row) {
                set.insert(v.as_str());
            }
        }

        let categories = seen
            .into_iter()
            .map(|set| set.into_iter().map(str::to_string).collect())
            .collect();
        Ok(Self { categories })
    }

    /// Categories of column `column`, sorted.
    pub fn categories(&self, column: usize) -> &[String] {
        self.categories.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of indicator columns.
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn transform_into(&self, row: &[String], out: &mut Vec<f64>) {
        for (cats, value) in self.categories.iter().zip(row) {
            out.extend(cats.iter().map(|c| if c == value { 1.0 } else { 0.0 }));
        }
    }
}

/// Scaler over the numeric features followed by the encoder over the
/// categorical ones, producing the regressor's input vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    scaler: StandardScaler,
    encoder: OneHotEncoder,
}

impl Preprocessor {
    pub fn fit(rows: &[FeatureRow]) -> Result<Self, YieldError> {
        let numeric: Vec<&[f64]> = rows.iter().map(|r| r.numeric.as_slice()).collect();
        let categorical: Vec<&[String]> = rows.iter().map(|r| r.categorical.as_slice()).collect();
        Ok(Self {
            scaler: StandardScaler::fit(&numeric)?,
            encoder: OneHotEncoder::fit(&categorical)?,
        })
    }

    pub fn transform(&self, row: &FeatureRow) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.width());
        self.scaler.transform_into(&row.numeric, &mut out);
        self.encoder.transform_into(&row.categorical, &mut out);
        out
    }

    pub fn transform_all(&self, rows: &[FeatureRow]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    /// Width of the transformed vector.
    pub fn width(&self) -> usize {
        self.scaler.width() + self.encoder.width()
    }

    /// Names of the transformed columns: numeric names, then
    /// `{column}_{category}` for every indicator.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect();
        for (i, column) in CATEGORICAL_FEATURES.iter().enumerate() {
            names.extend(self.encoder.categories(i).iter().map(|c| format!("{column}_{c}")));
        }
        names
    }

    /// Crop labels seen during fitting.
    pub fn crop_labels(&self) -> &[String] {
        self.encoder.categories(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ndvi: f64, crop: &str, cloud: &str, season: &str) -> FeatureRow {
        FeatureRow {
            numeric: [ndvi, 1.0, 2.0, 1.0, 3.0, 4.0, 1.0, 5.0, 0.1],
            categorical: [crop.to_string(), cloud.to_string(), season.to_string()],
        }
    }

    #[test]
    fn test_scaler_centers_and_scales() {
        let scaler = StandardScaler::fit(&[vec![1.0, 5.0], vec![3.0, 5.0]]).unwrap();
        let mut out = Vec::new();
        scaler.transform_into(&[1.0, 5.0], &mut out);
        scaler.transform_into(&[3.0, 7.0], &mut out);
        // mean 2, std 1 on the first column; constant second column scales by 1
        assert_eq!(out, vec![-1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_scaler_rejects_ragged_rows() {
        let err = StandardScaler::fit(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, YieldError::SchemaMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_scaler_empty() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(StandardScaler::fit(&rows), Err(YieldError::EmptyDataset)));
    }

    #[test]
    fn test_encoder_sorted_categories_and_unknown() {
        let rows = vec![
            vec!["Rice".to_string(), "Clear".to_string()],
            vec!["Maize".to_string(), "Overcast".to_string()],
            vec!["Rice".to_string(), "Clear".to_string()],
        ];
        let encoder = OneHotEncoder::fit(&rows).unwrap();
        assert_eq!(encoder.categories(0), ["Maize", "Rice"]);
        assert_eq!(encoder.width(), 4);

        let mut out = Vec::new();
        encoder.transform_into(&["Rice".to_string(), "Hail".to_string()], &mut out);
        assert_eq!(out, vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_preprocessor_feature_names() {
        let rows = vec![
            row(0.2, "Wheat", "Clear", "Winter"),
            row(0.8, "Maize", "Cloudy", "Summer"),
        ];
        let pre = Preprocessor::fit(&rows).unwrap();
        let names = pre.feature_names();
        assert_eq!(names.len(), pre.width());
        assert_eq!(names[0], "ndvi");
        assert_eq!(names[9], "crop_type_Maize");
        assert_eq!(names.last().unwrap(), "season_Winter");
        assert_eq!(pre.crop_labels(), ["Maize", "Wheat"]);
        assert_eq!(pre.transform(&rows[0]).len(), 15);
    }
}
