//! Application error types and Axum response conversion.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Application-level errors with HTTP status code mapping. The payload is
/// returned to the client under `detail`.
#[derive(Debug)]
pub enum AppError {
    /// Input failed validation.
    BadRequest(Value),
    /// Body was not valid JSON for the endpoint.
    Unprocessable(String),
    /// Model failure.
    Internal(Value),
}

impl AppError {
    pub fn bad_request(detail: impl Into<Value>) -> Self {
        AppError::BadRequest(detail.into())
    }

    pub fn internal(detail: impl Into<Value>) -> Self {
        AppError::Internal(detail.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Unprocessable(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: Value,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            AppError::BadRequest(detail) | AppError::Internal(detail) => detail,
            AppError::Unprocessable(message) => Value::String(message),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
