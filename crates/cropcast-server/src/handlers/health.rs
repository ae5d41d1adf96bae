//! Liveness and model status.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::ServerState;

/// GET /health - Service status, model kind and accepted crops.
pub async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        model_status: state.predictor.status(),
        available_crops: state.predictor.crops().names(),
    })
}
