//! End-to-end training run: split, fit, evaluate, rank features.

use cropcast_core::{FeatureRow, Observation, YieldError};
use serde::Serialize;
use tracing::info;

use crate::artifact::ModelArtifact;
use crate::baseline::BaselineConditions;
use crate::dataset::train_test_split;
use crate::forest::ForestParams;
use crate::metrics::{permutation_importance, r2_score, root_mean_squared_error, Evaluation};
use crate::pipeline::YieldPipeline;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOptions {
    pub test_size: f64,
    pub seed: u64,
    pub forest: ForestParams,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self { test_size: 0.2, seed: 42, forest: ForestParams::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestPrediction {
    pub actual: f64,
    pub predicted: f64,
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub evaluation: Evaluation,
    /// Sorted by descending importance.
    pub importances: Vec<FeatureImportance>,
    pub test_predictions: Vec<TestPrediction>,
}

pub fn train(
    observations: &[Observation],
    targets: &[f64],
    options: &TrainOptions,
) -> Result<TrainingOutcome, YieldError> {
    if observations.is_empty() {
        return Err(YieldError::EmptyDataset);
    }
    if observations.len() != targets.len() {
        return Err(YieldError::Dataset(format!(
            "{} observations but {} targets",
            observations.len(),
            targets.len()
        )));
    }

    let (train_idx, test_idx) = train_test_split(observations.len(), options.test_size, options.seed)?;
    info!("Split {} rows into {} train / {} test", observations.len(), train_idx.len(), test_idx.len());

    let train_obs: Vec<Observation> = train_idx.iter().map(|&i| observations[i].clone()).collect();
    let train_rows: Vec<FeatureRow> = train_obs.iter().map(Observation::features).collect();
    let train_y: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();

    let test_rows: Vec<FeatureRow> = test_idx.iter().map(|&i| observations[i].features()).collect();
    let test_y: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();

    info!("Fitting random forest with {} trees", options.forest.n_trees);
    let pipeline = YieldPipeline::fit(&train_rows, &train_y, options.forest)?;

    let test_x = pipeline.transform(&test_rows);
    let predicted = pipeline.predict_transformed(&test_x)?;

    let evaluation = Evaluation {
        rmse: root_mean_squared_error(&test_y, &predicted),
        r2: r2_score(&test_y, &predicted),
        n_train: train_rows.len(),
        n_test: test_rows.len(),
    };
    info!(rmse = evaluation.rmse, r2 = evaluation.r2, "Evaluated on held-out split");

    let scores = permutation_importance(&test_x, &test_y, options.seed, |x| {
        pipeline.predict_transformed(x)
    })?;
    let mut importances: Vec<FeatureImportance> = pipeline
        .feature_names()
        .into_iter()
        .zip(scores)
        .map(|(feature, importance)| FeatureImportance { feature, importance })
        .collect();
    importances.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    let test_predictions = test_y
        .iter()
        .zip(&predicted)
        .map(|(&actual, &predicted)| TestPrediction { actual, predicted })
        .collect();

    let baseline = BaselineConditions::from_observations(&train_obs)?;
    let artifact = ModelArtifact::new(pipeline, baseline, Some(evaluation));

    Ok(TrainingOutcome { artifact, evaluation, importances, test_predictions })
}
