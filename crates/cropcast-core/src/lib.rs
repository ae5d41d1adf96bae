//! Core domain types and error definitions for cropcast.
//!
//! This crate provides the types shared by the trainer and the server:
//!
//! - [`YieldError`] — Error type for dataset, model and artifact operations
//! - [`Observation`] and [`FeatureRow`] — Raw agronomic records and their engineered form
//! - [`Season`] — Derived categorical feature
//! - [`CropCatalog`] — Ordered list of crops the service accepts
//!
//! # Example
//!
//! ```rust
//! use cropcast_core::{Observation, Season};
//!
//! let obs = Observation {
//!     ndvi: 0.5,
//!     temp_min: 20.0,
//!     temp_max: 30.0,
//!     humidity_min: 40.0,
//!     humidity_max: 70.0,
//!     rainfall_mm: 200.0,
//!     soil_moisture: 0.3,
//!     crop_type: "Maize".to_string(),
//!     cloud_condition: "Partly Cloudy".to_string(),
//!     month: 6,
//! };
//!
//! let row = obs.features();
//! assert_eq!(row.season(), Season::Summer.as_str());
//! ```

mod catalog;
mod features;

pub use catalog::{CropCatalog, ResolvedCrop, FALLBACK_CROPS};
pub use features::{
    title_case, FeatureRow, Observation, Season, CATEGORICAL_FEATURES, NUMERIC_FEATURES,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading data, fitting or querying a model.
#[derive(Error, Debug)]
pub enum YieldError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact JSON could not be encoded or decoded.
    #[error("Failed to parse model artifact: {0}")]
    Artifact(#[from] serde_json::Error),

    /// Artifact was written by an incompatible version of the trainer.
    #[error("Unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Dataset could not be read or contains invalid rows.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// No usable rows were available.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Model fitting failed.
    #[error("Model fitting failed: {0}")]
    Fit(String),

    /// Model inference failed.
    #[error("Prediction failed: {0}")]
    Predict(String),

    /// Inference row does not match the width the model was fitted on.
    #[error("Feature schema mismatch: model expects {expected} features, got {found}")]
    SchemaMismatch { expected: usize, found: usize },

    /// Crop index is outside the catalog.
    #[error("Unknown crop index: {0}")]
    UnknownCrop(usize),
}

/// Whether the service runs on a trained artifact or the synthetic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    /// A trained artifact was loaded from disk.
    Production,
    /// The artifact could not be loaded; a synthetic model is in use.
    Placeholder,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Production => "production",
            ModelStatus::Placeholder => "placeholder",
        }
    }
}

/// Rounds to two decimal places, the precision the API reports yields in.
/// Exact halves round to the even digit.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
