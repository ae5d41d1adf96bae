use cropcast_core::ModelStatus;
use cropcast_model::{CropScore, Recommendation};
use serde::{Deserialize, Serialize};

pub const UNITS: &str = "tons/hectare";
pub const MODEL_VERSION: &str = "1.0";

// === Requests ===

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YieldInput {
    pub crop_type: String,
    pub ndvi: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchYieldInput {
    pub items: Vec<YieldInput>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NdviInput {
    pub ndvi: f64,
}

// === Responses ===

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model_status: ModelStatus,
    pub available_crops: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldPrediction {
    pub predicted_yield: f64,
    pub crop_type: String,
    pub units: String,
    pub model_version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchYieldPrediction {
    pub predictions: Vec<YieldPrediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropOption {
    pub crop: String,
    pub predicted_yield: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub recommended_crop: String,
    pub predicted_yield: f64,
    pub all_options: Vec<CropOption>,
    pub units: String,
}

impl From<CropScore> for CropOption {
    fn from(score: CropScore) -> Self {
        Self { crop: score.crop, predicted_yield: score.predicted_yield }
    }
}

impl From<Recommendation> for CropRecommendation {
    fn from(rec: Recommendation) -> Self {
        Self {
            recommended_crop: rec.recommended_crop,
            predicted_yield: rec.predicted_yield,
            all_options: rec.all_options.into_iter().map(CropOption::from).collect(),
            units: UNITS.to_string(),
        }
    }
}
