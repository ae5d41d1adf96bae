//! Model side of cropcast: preprocessing, the random-forest pipeline,
//! training, the on-disk artifact and the serving predictor.
//!
//! - [`YieldPipeline`] — Standard scaling + one-hot encoding feeding a forest
//! - [`train`] — Split, fit, evaluate and rank features for a dataset
//! - [`ModelArtifact`] — JSON artifact with the fitted pipeline and metadata
//! - [`Predictor`] — Trained artifact or synthetic placeholder, shared by the server

mod artifact;
mod baseline;
mod dataset;
mod forest;
mod metrics;
mod pipeline;
mod placeholder;
mod predictor;
mod preprocess;
mod training;

pub use artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use baseline::BaselineConditions;
pub use dataset::{train_test_split, ColumnSummary, Dataset, RawRecord, COLUMNS};
pub use forest::{Forest, ForestParams};
pub use metrics::{
    mean_squared_error, permutation_importance, r2_score, root_mean_squared_error, Evaluation,
};
pub use pipeline::YieldPipeline;
pub use placeholder::PlaceholderModel;
pub use predictor::{CropScore, Predictor, Recommendation};
pub use preprocess::{OneHotEncoder, Preprocessor, StandardScaler};
pub use training::{train, FeatureImportance, TestPrediction, TrainOptions, TrainingOutcome};
