//! Preprocessing + regression pipeline.

use cropcast_core::{FeatureRow, YieldError};
use serde::{Deserialize, Serialize};

use crate::forest::{Forest, ForestParams};
use crate::preprocess::Preprocessor;

/// Fitted preprocessor and forest. Inputs are engineered [`FeatureRow`]s;
/// the preprocessor's schema is the one the forest was fitted on.
#[derive(Debug, Serialize, Deserialize)]
pub struct YieldPipeline {
    preprocessor: Preprocessor,
    forest: Forest,
}

impl YieldPipeline {
    pub fn fit(rows: &[FeatureRow], targets: &[f64], params: ForestParams) -> Result<Self, YieldError> {
        let preprocessor = Preprocessor::fit(rows)?;
        let x = preprocessor.transform_all(rows);
        let forest = Forest::fit(&x, targets, params)?;
        Ok(Self { preprocessor, forest })
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, YieldError> {
        self.forest.predict(&self.transform(rows))
    }

    /// Predicts from already-transformed feature vectors.
    pub fn predict_transformed(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, YieldError> {
        self.forest.predict(x)
    }

    pub fn transform(&self, rows: &[FeatureRow]) -> Vec<Vec<f64>> {
        self.preprocessor.transform_all(rows)
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.preprocessor.feature_names()
    }

    pub fn crop_labels(&self) -> &[String] {
        self.preprocessor.crop_labels()
    }

    pub fn forest_params(&self) -> ForestParams {
        self.forest.params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropcast_core::Observation;

    fn observation(i: usize) -> Observation {
        let crops = ["Wheat", "Rice", "Maize"];
        Observation {
            ndvi: 0.2 + (i % 10) as f64 * 0.07,
            temp_min: 15.0 + (i % 5) as f64,
            temp_max: 28.0 + (i % 7) as f64,
            humidity_min: 35.0,
            humidity_max: 70.0 + (i % 3) as f64,
            rainfall_mm: 150.0 + (i % 11) as f64 * 10.0,
            soil_moisture: 0.25,
            crop_type: crops[i % 3].to_string(),
            cloud_condition: "Clear".to_string(),
            month: (i % 12) as u32 + 1,
        }
    }

    #[test]
    fn test_pipeline_fit_predict() {
        let obs: Vec<Observation> = (0..60).map(observation).collect();
        let rows: Vec<FeatureRow> = obs.iter().map(Observation::features).collect();
        let targets: Vec<f64> = obs.iter().map(|o| o.ndvi * 10.0).collect();

        let pipeline = YieldPipeline::fit(&rows, &targets, ForestParams::new(10, 42)).unwrap();
        assert_eq!(pipeline.crop_labels(), ["Maize", "Rice", "Wheat"]);
        assert_eq!(pipeline.feature_names().len(), pipeline.transform(&rows[..1])[0].len());

        let preds = pipeline.predict(&rows[..5]).unwrap();
        assert_eq!(preds.len(), 5);
        assert!(preds.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_pipeline_empty_fit() {
        let err = YieldPipeline::fit(&[], &[], ForestParams::default()).unwrap_err();
        assert!(matches!(err, YieldError::EmptyDataset));
    }
}
