//! Serving-side model: either a trained artifact or the placeholder.

use std::path::Path;

use cropcast_core::{round2, CropCatalog, ModelStatus, YieldError};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::artifact::ModelArtifact;
use crate::placeholder::PlaceholderModel;

enum Engine {
    Production(Box<ModelArtifact>),
    Placeholder(PlaceholderModel),
}

/// Predicted yield of one crop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropScore {
    pub crop: String,
    pub predicted_yield: f64,
}

/// Best crop at a given NDVI together with every scored option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub recommended_crop: String,
    pub predicted_yield: f64,
    pub all_options: Vec<CropScore>,
}

/// Read-only model shared by all requests.
pub struct Predictor {
    engine: Engine,
    catalog: CropCatalog,
}

impl Predictor {
    /// Wraps a trained artifact. The catalog comes from the crop labels
    /// the pipeline was fitted on.
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        let catalog = CropCatalog::from_labels(artifact.pipeline.crop_labels());
        Self { engine: Engine::Production(Box::new(artifact)), catalog }
    }

    pub fn placeholder() -> Result<Self, YieldError> {
        let model = PlaceholderModel::create()?;
        let catalog = model.catalog().clone();
        Ok(Self { engine: Engine::Placeholder(model), catalog })
    }

    pub fn load(path: &Path) -> Result<Self, YieldError> {
        let artifact = ModelArtifact::load(path)?;
        Ok(Self::from_artifact(artifact))
    }

    /// Loads the artifact at `path`, or builds the placeholder if that fails
    /// for any reason.
    pub fn load_or_placeholder(path: &Path) -> Result<Self, YieldError> {
        info!("Attempting to load model from: {}", path.display());

        match Self::load(path) {
            Ok(predictor) => {
                info!("Model loaded successfully");
                Ok(predictor)
            }
            Err(e) => {
                error!("Failed to load model: {}", e);
                info!("Creating placeholder model");
                Self::placeholder()
            }
        }
    }

    pub fn status(&self) -> ModelStatus {
        match self.engine {
            Engine::Production(_) => ModelStatus::Production,
            Engine::Placeholder(_) => ModelStatus::Placeholder,
        }
    }

    pub fn crops(&self) -> &CropCatalog {
        &self.catalog
    }

    pub fn model_id(&self) -> Option<Uuid> {
        match &self.engine {
            Engine::Production(artifact) => Some(artifact.model_id),
            Engine::Placeholder(_) => None,
        }
    }

    /// Raw yield prediction for the crop at `crop_index` in the catalog.
    pub fn predict(&self, crop_index: usize, ndvi: f64) -> Result<f64, YieldError> {
        match &self.engine {
            Engine::Placeholder(model) => model.predict(crop_index, ndvi),
            Engine::Production(artifact) => {
                let crop = self
                    .catalog
                    .get(crop_index)
                    .ok_or(YieldError::UnknownCrop(crop_index))?;
                let observation = artifact.baseline.observation(crop.label, ndvi);
                artifact.predict(&observation)
            }
        }
    }

    /// Scores every catalog crop at `ndvi` (rounded to two decimals) and
    /// picks the first highest.
    pub fn recommend(&self, ndvi: f64) -> Result<Recommendation, YieldError> {
        let mut all_options = Vec::with_capacity(self.catalog.len());
        for (index, crop) in self.catalog.names().into_iter().enumerate() {
            let predicted_yield = round2(self.predict(index, ndvi)?);
            all_options.push(CropScore { crop, predicted_yield });
        }

        let mut best: Option<&CropScore> = None;
        for option in &all_options {
            if best.map_or(true, |b| option.predicted_yield > b.predicted_yield) {
                best = Some(option);
            }
        }
        let best = best
            .cloned()
            .ok_or_else(|| YieldError::Predict("crop catalog is empty".into()))?;

        Ok(Recommendation {
            recommended_crop: best.crop,
            predicted_yield: best.predicted_yield,
            all_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_placeholder() {
        let path = std::env::temp_dir().join(format!("cropcast-missing-{}.json", Uuid::new_v4()));
        let predictor = Predictor::load_or_placeholder(&path).unwrap();
        assert_eq!(predictor.status(), ModelStatus::Placeholder);
        assert_eq!(predictor.crops(), &CropCatalog::fallback());
        assert!(predictor.model_id().is_none());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_placeholder() {
        let path = std::env::temp_dir().join(format!("cropcast-corrupt-{}.json", Uuid::new_v4()));
        std::fs::write(&path, b"not json").unwrap();
        let predictor = Predictor::load_or_placeholder(&path).unwrap();
        assert_eq!(predictor.status(), ModelStatus::Placeholder);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_placeholder_recommends_barley() {
        let predictor = Predictor::placeholder().unwrap();
        let rec = predictor.recommend(0.65).unwrap();
        assert_eq!(rec.recommended_crop, "Barley");
        assert_eq!(rec.all_options.len(), 5);
        assert_eq!(rec.all_options[0].crop, "Wheat");
        let max = rec
            .all_options
            .iter()
            .map(|o| o.predicted_yield)
            .fold(f64::MIN, f64::max);
        assert_eq!(rec.predicted_yield, max);
    }

    #[test]
    fn test_predict_unknown_index() {
        let predictor = Predictor::placeholder().unwrap();
        assert!(matches!(predictor.predict(5, 0.5), Err(YieldError::UnknownCrop(5))));
    }
}
