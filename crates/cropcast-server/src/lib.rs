//! Crop yield prediction service.
//!
//! A single [`Predictor`] is loaded at startup and shared read-only by every
//! request; see [`router`] for the routes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use cropcast_model::Predictor;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ServerState {
    pub predictor: Predictor,
}

impl ServerState {
    pub fn new(predictor: Predictor) -> Self {
        Self { predictor }
    }
}

/// Builds the application router. Prediction routes are request-logged;
/// `/health` is not.
pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/api/predict-yield", post(handlers::prediction::predict_yield))
        .route("/api/predict-yield/batch", post(handlers::prediction::predict_batch))
        .route("/api/recommended-crop", post(handlers::prediction::recommend_crop))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health::health))
        .layer(cors)
        .with_state(state)
}
