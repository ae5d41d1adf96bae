//! Yield prediction and crop recommendation handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use tracing::info;

use crate::dto::{
    BatchYieldInput, BatchYieldPrediction, CropRecommendation, NdviInput, YieldInput,
    YieldPrediction,
};
use crate::error::AppError;
use crate::services::prediction as prediction_service;
use crate::ServerState;

/// POST /api/predict-yield - Predict the yield of one crop at an NDVI value.
pub async fn predict_yield(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<YieldInput>, JsonRejection>,
) -> Result<Json<YieldPrediction>, AppError> {
    let Json(input) = payload?;
    let prediction = prediction_service::predict_yield(&state.predictor, &input)?;
    info!("Predicted {} t/ha for {}", prediction.predicted_yield, prediction.crop_type);
    Ok(Json(prediction))
}

/// POST /api/predict-yield/batch - Predict several crop/NDVI pairs at once.
pub async fn predict_batch(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<BatchYieldInput>, JsonRejection>,
) -> Result<Json<BatchYieldPrediction>, AppError> {
    let Json(input) = payload?;
    let predictions = prediction_service::predict_batch(&state.predictor, &input)?;
    Ok(Json(predictions))
}

/// POST /api/recommended-crop - Best crop for an NDVI value.
pub async fn recommend_crop(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<NdviInput>, JsonRejection>,
) -> Result<Json<CropRecommendation>, AppError> {
    let Json(input) = payload?;
    let recommendation = prediction_service::recommend_crop(&state.predictor, &input)?;
    info!(
        "Recommended {} at NDVI {}",
        recommendation.recommended_crop, input.ndvi
    );
    Ok(Json(recommendation))
}
