//! Raw observations and feature engineering.

use serde::{Deserialize, Serialize};

/// Numeric model inputs, in the column order the preprocessor expects.
pub const NUMERIC_FEATURES: [&str; 9] = [
    "ndvi",
    "temp_min",
    "temp_max",
    "temp_range",
    "humidity_min",
    "humidity_max",
    "humidity_range",
    "rainfall_mm",
    "soil_moisture",
];

/// Categorical model inputs, in the column order the preprocessor expects.
pub const CATEGORICAL_FEATURES: [&str; 3] = ["crop_type", "cloud_condition", "season"];

/// Growing season derived from the observation month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Maps a month number to its season. Anything that is not a winter,
    /// spring or summer month is Autumn.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

/// A single field observation, as found in the training CSV minus the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Vegetation index.
    pub ndvi: f64,
    /// Minimum temperature (°C).
    pub temp_min: f64,
    /// Maximum temperature (°C).
    pub temp_max: f64,
    /// Minimum relative humidity (%).
    pub humidity_min: f64,
    /// Maximum relative humidity (%).
    pub humidity_max: f64,
    /// Rainfall in millimetres.
    pub rainfall_mm: f64,
    /// Volumetric soil moisture.
    pub soil_moisture: f64,
    /// Crop label, e.g. "Maize".
    pub crop_type: String,
    /// Sky condition, e.g. "Partly Cloudy".
    pub cloud_condition: String,
    /// Month number (1-12).
    pub month: u32,
}

impl Observation {
    /// Engineers the model's feature row: adds the temperature and humidity
    /// ranges and the season.
    pub fn features(&self) -> FeatureRow {
        FeatureRow {
            numeric: [
                self.ndvi,
                self.temp_min,
                self.temp_max,
                self.temp_max - self.temp_min,
                self.humidity_min,
                self.humidity_max,
                self.humidity_max - self.humidity_min,
                self.rainfall_mm,
                self.soil_moisture,
            ],
            categorical: [
                self.crop_type.clone(),
                self.cloud_condition.clone(),
                Season::from_month(self.month).as_str().to_string(),
            ],
        }
    }
}

/// Engineered model input. Column order follows [`NUMERIC_FEATURES`] and
/// [`CATEGORICAL_FEATURES`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub numeric: [f64; 9],
    pub categorical: [String; 3],
}

impl FeatureRow {
    pub fn crop_type(&self) -> &str {
        &self.categorical[0]
    }

    pub fn season(&self) -> &str {
        &self.categorical[2]
    }
}

/// Title-cases a label: the first letter of every alphabetic run is
/// uppercased and the rest lowercased, so `"partly cloudy"` becomes
/// `"Partly Cloudy"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Observation {
        Observation {
            ndvi: 0.5,
            temp_min: 20.0,
            temp_max: 30.0,
            humidity_min: 40.0,
            humidity_max: 70.0,
            rainfall_mm: 200.0,
            soil_moisture: 0.3,
            crop_type: "Maize".to_string(),
            cloud_condition: "Partly Cloudy".to_string(),
            month: 6,
        }
    }

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(2), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(5), Season::Spring);
        assert_eq!(Season::from_month(6), Season::Summer);
        assert_eq!(Season::from_month(8), Season::Summer);
        assert_eq!(Season::from_month(9), Season::Autumn);
        assert_eq!(Season::from_month(11), Season::Autumn);
    }

    #[test]
    fn test_out_of_range_month_is_autumn() {
        assert_eq!(Season::from_month(0), Season::Autumn);
        assert_eq!(Season::from_month(13), Season::Autumn);
    }

    #[test]
    fn test_features_derives_ranges_and_season() {
        let row = sample().features();
        assert_eq!(row.numeric[3], 10.0);
        assert_eq!(row.numeric[6], 30.0);
        assert_eq!(row.crop_type(), "Maize");
        assert_eq!(row.categorical[1], "Partly Cloudy");
        assert_eq!(row.season(), "Summer");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("wheat"), "Wheat");
        assert_eq!(title_case("MAIZE"), "Maize");
        assert_eq!(title_case("partly cloudy"), "Partly Cloudy");
        assert_eq!(title_case("sweet-potato"), "Sweet-Potato");
        assert_eq!(title_case(""), "");
    }
}
