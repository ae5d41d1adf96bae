//! HTTP route handlers for the prediction service.

pub mod health;
pub mod prediction;
