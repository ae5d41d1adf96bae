//! Synthetic stand-in model used when no trained artifact can be loaded.

use cropcast_core::{CropCatalog, YieldError};
use tracing::warn;

use crate::forest::{Forest, ForestParams};

const NDVI_LOW: f64 = 0.3;
const NDVI_HIGH: f64 = 0.9;
const NDVI_STEPS: usize = 10;

/// Two-feature forest over `[crop_index, ndvi]`, fitted on
/// `yield = (crop_index + 1) * 2 + ndvi * 5` for the fallback crops.
#[derive(Debug)]
pub struct PlaceholderModel {
    forest: Forest,
    catalog: CropCatalog,
}

impl PlaceholderModel {
    pub fn create() -> Result<Self, YieldError> {
        warn!("Creating placeholder model - replace with your real trained model");

        let catalog = CropCatalog::fallback();
        let mut x = Vec::with_capacity(catalog.len() * NDVI_STEPS);
        let mut y = Vec::with_capacity(catalog.len() * NDVI_STEPS);

        for i in 0..catalog.len() {
            for ndvi in linspace(NDVI_LOW, NDVI_HIGH, NDVI_STEPS) {
                x.push(vec![i as f64, ndvi]);
                y.push((i + 1) as f64 * 2.0 + ndvi * 5.0);
            }
        }

        let forest = Forest::fit(&x, &y, ForestParams::new(10, 42))?;
        Ok(Self { forest, catalog })
    }

    pub fn catalog(&self) -> &CropCatalog {
        &self.catalog
    }

    pub fn predict(&self, crop_index: usize, ndvi: f64) -> Result<f64, YieldError> {
        if crop_index >= self.catalog.len() {
            return Err(YieldError::UnknownCrop(crop_index));
        }
        let preds = self.forest.predict(&[vec![crop_index as f64, ndvi]])?;
        preds
            .first()
            .copied()
            .ok_or_else(|| YieldError::Predict("model returned no prediction".into()))
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (end - start) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| start + step * i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_inclusive() {
        let v: Vec<f64> = linspace(0.3, 0.9, 10).collect();
        assert_eq!(v.len(), 10);
        assert!((v[0] - 0.3).abs() < 1e-12);
        assert!((v[9] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_placeholder_orders_crops() {
        let model = PlaceholderModel::create().unwrap();
        assert_eq!(model.catalog().len(), 5);

        let wheat = model.predict(0, 0.6).unwrap();
        let barley = model.predict(4, 0.6).unwrap();
        assert!(barley > wheat, "barley {barley} should beat wheat {wheat}");
        assert!(wheat > 2.0 && barley < 15.0);
    }

    #[test]
    fn test_placeholder_unknown_index() {
        let model = PlaceholderModel::create().unwrap();
        assert!(matches!(model.predict(9, 0.5), Err(YieldError::UnknownCrop(9))));
    }
}
