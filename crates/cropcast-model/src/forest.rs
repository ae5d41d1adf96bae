//! Random-forest regressor backed by smartcore.

use std::fmt;

use cropcast_core::YieldError;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

type Regressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Ensemble hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees.
    pub n_trees: usize,
    /// Bootstrap and feature-sampling seed.
    pub seed: u64,
    /// Depth limit per tree; unlimited when `None`.
    pub max_depth: Option<u16>,
    /// Candidate features tried at each split; every feature when `None`.
    #[serde(default)]
    pub max_features: Option<usize>,
}

impl ForestParams {
    pub fn new(n_trees: usize, seed: u64) -> Self {
        Self { n_trees, seed, max_depth: None, max_features: None }
    }

    pub fn with_max_depth(mut self, max_depth: Option<u16>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Features considered per split for an input of width `n_features`.
    pub fn split_candidates(&self, n_features: usize) -> usize {
        self.max_features.map_or(n_features, |m| m.clamp(1, n_features.max(1)))
    }
}

impl Default for ForestParams {
    fn default() -> Self {
        Self::new(100, 42)
    }
}

/// Fitted forest together with the input width it was trained on.
#[derive(Serialize, Deserialize)]
pub struct Forest {
    params: ForestParams,
    n_features: usize,
    model: Regressor,
}

impl Forest {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: ForestParams) -> Result<Self, YieldError> {
        let n_features = x.first().map(Vec::len).ok_or(YieldError::EmptyDataset)?;
        if x.len() != y.len() {
            return Err(YieldError::Fit(format!(
                "{} feature rows but {} targets",
                x.len(),
                y.len()
            )));
        }
        check_width(x, n_features)?;

        let parameters = RandomForestRegressorParameters {
            n_trees: params.n_trees,
            seed: params.seed,
            max_depth: params.max_depth,
            m: Some(params.split_candidates(n_features)),
            ..Default::default()
        };

        let matrix = DenseMatrix::from_2d_vec(&x.to_vec());
        let model: Regressor = RandomForestRegressor::fit(&matrix, &y.to_vec(), parameters)
            .map_err(|e| YieldError::Fit(e.to_string()))?;

        tracing::debug!(
            n_trees = params.n_trees,
            n_samples = x.len(),
            n_features,
            "Fitted random forest"
        );

        Ok(Self { params, n_features, model })
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, YieldError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        check_width(x, self.n_features)?;

        let matrix = DenseMatrix::from_2d_vec(&x.to_vec());
        self.model
            .predict(&matrix)
            .map_err(|e| YieldError::Predict(e.to_string()))
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn params(&self) -> ForestParams {
        self.params
    }
}

impl fmt::Debug for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forest")
            .field("params", &self.params)
            .field("n_features", &self.n_features)
            .finish_non_exhaustive()
    }
}

fn check_width(x: &[Vec<f64>], expected: usize) -> Result<(), YieldError> {
    match x.iter().find(|row| row.len() != expected) {
        Some(row) => Err(YieldError::SchemaMismatch { expected, found: row.len() }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64, (i % 4) as f64]).collect();
        let y = x.iter().map(|r| 2.0 * r[0] + 1.0).collect();
        (x, y)
    }

    #[test]
    fn test_fit_and_predict() {
        let (x, y) = linear_data();
        let forest = Forest::fit(&x, &y, ForestParams::new(10, 42)).unwrap();
        assert_eq!(forest.n_features(), 2);

        let preds = forest.predict(&[vec![5.0, 1.0], vec![35.0, 3.0]]).unwrap();
        assert_eq!(preds.len(), 2);
        assert!(preds[0] < preds[1]);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let (x, y) = linear_data();
        let a = Forest::fit(&x, &y, ForestParams::new(5, 7)).unwrap();
        let b = Forest::fit(&x, &y, ForestParams::new(5, 7)).unwrap();
        let probe = vec![vec![12.5, 2.0]];
        assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    }

    #[test]
    fn test_width_mismatch() {
        let (x, y) = linear_data();
        let forest = Forest::fit(&x, &y, ForestParams::new(3, 42)).unwrap();
        let err = forest.predict(&[vec![1.0]]).unwrap_err();
        assert!(matches!(err, YieldError::SchemaMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_target_length_mismatch() {
        let (x, _) = linear_data();
        assert!(matches!(
            Forest::fit(&x, &[1.0], ForestParams::default()),
            Err(YieldError::Fit(_))
        ));
    }

    #[test]
    fn test_split_candidates_default_to_all_features() {
        let params = ForestParams::default();
        assert_eq!(params.split_candidates(2), 2);
        assert_eq!(params.split_candidates(27), 27);

        let limited = params.with_max_features(Some(5));
        assert_eq!(limited.split_candidates(27), 5);
        assert_eq!(limited.split_candidates(3), 3);
        assert_eq!(params.with_max_features(Some(0)).split_candidates(4), 1);
    }

    #[test]
    fn test_empty_predict() {
        let (x, y) = linear_data();
        let forest = Forest::fit(&x, &y, ForestParams::new(3, 42)).unwrap();
        assert!(forest.predict(&[]).unwrap().is_empty());
    }
}
