//! CSV dataset loading, exploration statistics and train/test splitting.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use cropcast_core::{Observation, YieldError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Columns read from the dataset, in report order.
pub const COLUMNS: [&str; 11] = [
    "ndvi",
    "temp_min",
    "temp_max",
    "humidity_min",
    "humidity_max",
    "rainfall_mm",
    "soil_moisture",
    "crop_type",
    "cloud_condition",
    "month",
    "crop_yield",
];

/// One CSV row. Empty cells deserialize as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub ndvi: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity_min: Option<f64>,
    pub humidity_max: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub crop_type: Option<String>,
    pub cloud_condition: Option<String>,
    pub month: Option<u32>,
    pub crop_yield: Option<f64>,
}

impl RawRecord {
    /// Numeric value of column `name`, if numeric and present.
    pub fn numeric(&self, name: &str) -> Option<f64> {
        match name {
            "ndvi" => self.ndvi,
            "temp_min" => self.temp_min,
            "temp_max" => self.temp_max,
            "humidity_min" => self.humidity_min,
            "humidity_max" => self.humidity_max,
            "rainfall_mm" => self.rainfall_mm,
            "soil_moisture" => self.soil_moisture,
            "month" => self.month.map(f64::from),
            "crop_yield" => self.crop_yield,
            _ => None,
        }
    }

    fn is_missing(&self, name: &str) -> bool {
        match name {
            "crop_type" => self.crop_type.as_deref().map_or(true, |s| s.trim().is_empty()),
            "cloud_condition" => self
                .cloud_condition
                .as_deref()
                .map_or(true, |s| s.trim().is_empty()),
            _ => self.numeric(name).map_or(true, |v| !v.is_finite()),
        }
    }

    /// Converts to an observation and target when every column is present.
    pub fn complete(&self) -> Option<(Observation, f64)> {
        if COLUMNS.iter().any(|c| self.is_missing(c)) {
            return None;
        }
        let observation = Observation {
            ndvi: self.ndvi?,
            temp_min: self.temp_min?,
            temp_max: self.temp_max?,
            humidity_min: self.humidity_min?,
            humidity_max: self.humidity_max?,
            rainfall_mm: self.rainfall_mm?,
            soil_moisture: self.soil_moisture?,
            crop_type: self.crop_type.as_deref()?.trim().to_string(),
            cloud_condition: self.cloud_condition.as_deref()?.trim().to_string(),
            month: self.month?,
        };
        Some((observation, self.crop_yield?))
    }
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Rows of a loaded CSV file.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<RawRecord>,
}

impl Dataset {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn load_csv(path: &Path) -> Result<Self, YieldError> {
        let file = File::open(path)?;
        Self::read_csv(file)
    }

    /// Parses CSV with a header row. Unknown columns are ignored.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, YieldError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<RawRecord>().enumerate() {
            // header is line 1
            let record = row.map_err(|e| YieldError::Dataset(format!("line {}: {}", i + 2, e)))?;
            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), COLUMNS.len())
    }

    pub fn head(&self, n: usize) -> &[RawRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Missing-value count per column, in [`COLUMNS`] order.
    pub fn missing_counts(&self) -> Vec<(&'static str, usize)> {
        COLUMNS
            .iter()
            .map(|&c| (c, self.records.iter().filter(|r| r.is_missing(c)).count()))
            .collect()
    }

    /// Statistics for every numeric column that has at least one value.
    pub fn describe(&self) -> Vec<ColumnSummary> {
        COLUMNS
            .iter()
            .filter_map(|&c| {
                let mut values: Vec<f64> = self
                    .records
                    .iter()
                    .filter_map(|r| r.numeric(c))
                    .filter(|v| v.is_finite())
                    .collect();
                summarize(c, &mut values)
            })
            .collect()
    }

    /// Complete rows as observations and targets; incomplete rows are dropped.
    pub fn complete_rows(&self) -> (Vec<Observation>, Vec<f64>) {
        self.records.iter().filter_map(RawRecord::complete).unzip()
    }
}

fn summarize(column: &str, values: &mut [f64]) -> Option<ColumnSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Some(ColumnSummary {
        column: column.to_string(),
        count: n,
        mean,
        std,
        min: values[0],
        q25: quantile(values, 0.25),
        median: quantile(values, 0.5),
        q75: quantile(values, 0.75),
        max: values[n - 1],
    })
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Shuffles `0..n` with a seeded RNG and holds out `ceil(n * test_size)`
/// indices for testing. Returns `(train, test)`.
pub fn train_test_split(
    n: usize,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), YieldError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(YieldError::Dataset(format!("test size must be in (0, 1), got {test_size}")));
    }

    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(YieldError::Dataset(format!(
            "{n} rows cannot be split with test size {test_size}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = indices.split_off(n_test);
    Ok((train, indices))
}
