//! Regression metrics and permutation feature importance.

use cropcast_core::YieldError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Held-out performance of a fitted pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub rmse: f64,
    pub r2: f64,
    pub n_train: usize,
    pub n_test: usize,
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    sum / actual.len() as f64
}

pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

/// Coefficient of determination. A constant target scores 1 when predicted
/// exactly and 0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Drop in R² when each column of `x` is shuffled, one column at a time.
///
/// `predict` maps a feature matrix to predictions; it is called once for the
/// baseline and once per column.
pub fn permutation_importance<F>(
    x: &[Vec<f64>],
    y: &[f64],
    seed: u64,
    predict: F,
) -> Result<Vec<f64>, YieldError>
where
    F: Fn(&[Vec<f64>]) -> Result<Vec<f64>, YieldError>,
{
    let Some(width) = x.first().map(Vec::len) else {
        return Ok(Vec::new());
    };

    let baseline = r2_score(y, &predict(x)?);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut importances = Vec::with_capacity(width);

    for col in 0..width {
        let mut column: Vec<f64> = x.iter().map(|row| row[col]).collect();
        column.shuffle(&mut rng);

        let permuted: Vec<Vec<f64>> = x
            .iter()
            .zip(&column)
            .map(|(row, v)| {
                let mut row = row.clone();
                row[col] = *v;
                row
            })
            .collect();

        importances.push(baseline - r2_score(y, &predict(permuted.as_slice())?));
    }

    Ok(importances)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_and_rmse() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [1.0, 2.0, 5.0];
        assert!((mean_squared_error(&actual, &predicted) - 4.0 / 3.0).abs() < 1e-12);
        assert!((root_mean_squared_error(&actual, &predicted) - (4.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_r2() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(r2_score(&actual, &actual), 1.0);
        assert_eq!(r2_score(&actual, &[2.5, 2.5, 2.5, 2.5]), 0.0);
        assert!(r2_score(&actual, &[4.0, 3.0, 2.0, 1.0]) < 0.0);
    }

    #[test]
    fn test_r2_constant_target() {
        assert_eq!(r2_score(&[2.0, 2.0], &[2.0, 2.0]), 1.0);
        assert_eq!(r2_score(&[2.0, 2.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_permutation_importance_ignores_unused_column() {
        // Target depends only on column 0.
        let x: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64, ((i * 7) % 5) as f64]).collect();
        let y: Vec<f64> = x.iter().map(|r| r[0]).collect();
        let predict = |m: &[Vec<f64>]| -> Result<Vec<f64>, YieldError> {
            Ok(m.iter().map(|r| r[0]).collect())
        };

        let imp = permutation_importance(&x, &y, 42, predict).unwrap();
        assert_eq!(imp.len(), 2);
        assert!(imp[0] > 0.5);
        assert_eq!(imp[1], 0.0);
    }
}
