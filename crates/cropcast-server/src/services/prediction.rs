//! Request validation and model invocation.

use cropcast_core::{round2, YieldError};
use cropcast_model::Predictor;
use serde_json::json;
use tracing::error;

use crate::dto::{
    BatchYieldInput, BatchYieldPrediction, CropRecommendation, NdviInput, YieldInput,
    YieldPrediction, MODEL_VERSION, UNITS,
};
use crate::error::AppError;

const NDVI_RANGE_MESSAGE: &str = "NDVI must be between 0 and 1";

fn ndvi_in_range(ndvi: f64) -> bool {
    (0.0..=1.0).contains(&ndvi)
}

/// Predicts the yield of one crop. The crop is checked before the NDVI.
pub fn predict_yield(predictor: &Predictor, input: &YieldInput) -> Result<YieldPrediction, AppError> {
    let crops = predictor.crops();
    let crop = crops.resolve(&input.crop_type).ok_or_else(|| {
        AppError::bad_request(json!({
            "error": "Invalid crop type",
            "available_crops": crops.names(),
            "received": input.crop_type,
        }))
    })?;

    if !ndvi_in_range(input.ndvi) {
        return Err(AppError::bad_request(json!({
            "error": "Invalid NDVI",
            "message": NDVI_RANGE_MESSAGE,
            "received": input.ndvi,
        })));
    }

    let prediction = predictor.predict(crop.index, input.ndvi).map_err(|e| {
        error!("Prediction error: {}", e);
        prediction_failed(&e)
    })?;

    Ok(YieldPrediction {
        predicted_yield: round2(prediction),
        crop_type: crop.name.to_string(),
        units: UNITS.to_string(),
        model_version: MODEL_VERSION.to_string(),
    })
}

/// Predicts every item, failing on the first invalid one with its index
/// added to the error detail.
pub fn predict_batch(
    predictor: &Predictor,
    input: &BatchYieldInput,
) -> Result<BatchYieldPrediction, AppError> {
    let mut predictions = Vec::with_capacity(input.items.len());
    for (index, item) in input.items.iter().enumerate() {
        let prediction = predict_yield(predictor, item).map_err(|e| with_index(e, index))?;
        predictions.push(prediction);
    }
    Ok(BatchYieldPrediction { predictions })
}

fn with_index(err: AppError, index: usize) -> AppError {
    match err {
        AppError::BadRequest(mut detail) => {
            if let Some(fields) = detail.as_object_mut() {
                fields.insert("index".into(), json!(index));
            }
            AppError::BadRequest(detail)
        }
        AppError::Internal(mut detail) => {
            if let Some(fields) = detail.as_object_mut() {
                fields.insert("index".into(), json!(index));
            }
            AppError::Internal(detail)
        }
        other => other,
    }
}

/// Scores every known crop at the given NDVI and returns the best.
pub fn recommend_crop(
    predictor: &Predictor,
    input: &NdviInput,
) -> Result<CropRecommendation, AppError> {
    if !ndvi_in_range(input.ndvi) {
        return Err(AppError::bad_request(NDVI_RANGE_MESSAGE));
    }

    let recommendation = predictor.recommend(input.ndvi).map_err(|e| {
        error!("Recommendation error: {}", e);
        recommendation_failed(&e)
    })?;

    Ok(recommendation.into())
}

fn prediction_failed(err: &YieldError) -> AppError {
    AppError::internal(json!({
        "error": "Prediction failed",
        "message": err.to_string(),
    }))
}

fn recommendation_failed(err: &YieldError) -> AppError {
    AppError::internal(format!("Recommendation failed: {}", err))
}
