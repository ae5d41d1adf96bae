//! Typical growing conditions used to complete partial queries.
//!
//! The service is only told a crop and an NDVI value. To feed the full
//! pipeline the remaining inputs come from the training set: medians for
//! the numeric columns and the most frequent cloud condition and month.

use std::collections::HashMap;
use std::hash::Hash;

use cropcast_core::{Observation, YieldError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConditions {
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity_min: f64,
    pub humidity_max: f64,
    pub rainfall_mm: f64,
    pub soil_moisture: f64,
    pub cloud_condition: String,
    pub month: u32,
}

impl BaselineConditions {
    pub fn from_observations(observations: &[Observation]) -> Result<Self, YieldError> {
        if observations.is_empty() {
            return Err(YieldError::EmptyDataset);
        }

        let column = |f: fn(&Observation) -> f64| median(observations.iter().map(f).collect());

        Ok(Self {
            temp_min: column(|o| o.temp_min),
            temp_max: column(|o| o.temp_max),
            humidity_min: column(|o| o.humidity_min),
            humidity_max: column(|o| o.humidity_max),
            rainfall_mm: column(|o| o.rainfall_mm),
            soil_moisture: column(|o| o.soil_moisture),
            cloud_condition: mode(observations.iter().map(|o| o.cloud_condition.clone())),
            month: mode(observations.iter().map(|o| o.month)),
        })
    }

    /// Builds a full observation for `crop_label` at `ndvi`.
    pub fn observation(&self, crop_label: &str, ndvi: f64) -> Observation {
        Observation {
            ndvi,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            humidity_min: self.humidity_min,
            humidity_max: self.humidity_max,
            rainfall_mm: self.rainfall_mm,
            soil_moisture: self.soil_moisture,
            crop_type: crop_label.to_string(),
            cloud_condition: self.cloud_condition.clone(),
            month: self.month,
        }
    }
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Most frequent value; ties go to the smallest.
fn mode<T: Ord + Hash + Default>(values: impl Iterator<Item = T>) -> T {
    let mut counts: HashMap<T, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(v, _)| v)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(temp_min: f64, cloud: &str, month: u32) -> Observation {
        Observation {
            ndvi: 0.5,
            temp_min,
            temp_max: temp_min + 10.0,
            humidity_min: 40.0,
            humidity_max: 70.0,
            rainfall_mm: 100.0,
            soil_moisture: 0.3,
            crop_type: "Rice".into(),
            cloud_condition: cloud.into(),
            month,
        }
    }

    #[test]
    fn test_median_and_mode() {
        let data = vec![
            obs(10.0, "Clear", 6),
            obs(14.0, "Cloudy", 6),
            obs(12.0, "Cloudy", 7),
            obs(20.0, "Clear", 7),
        ];
        let base = BaselineConditions::from_observations(&data).unwrap();
        assert_eq!(base.temp_min, 13.0);
        assert_eq!(base.temp_max, 23.0);
        // tie between Clear and Cloudy resolves to the smaller value
        assert_eq!(base.cloud_condition, "Clear");
        assert_eq!(base.month, 6);
    }

    #[test]
    fn test_observation_uses_query_values() {
        let base = BaselineConditions::from_observations(&[obs(10.0, "Overcast", 3)]).unwrap();
        let o = base.observation("Wheat", 0.8);
        assert_eq!(o.crop_type, "Wheat");
        assert_eq!(o.ndvi, 0.8);
        assert_eq!(o.cloud_condition, "Overcast");
        assert_eq!(o.month, 3);
    }

    #[test]
    fn test_empty() {
        assert!(BaselineConditions::from_observations(&[]).is_err());
    }
}
