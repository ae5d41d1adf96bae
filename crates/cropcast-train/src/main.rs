mod diagnostics;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cropcast_config::TrainConfig;
use cropcast_core::Observation;
use cropcast_model::{train, Dataset, ForestParams, TrainOptions};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "cropcast-train")]
#[command(about = "Train the crop yield model from a CSV dataset", long_about = None)]
struct Cli {
    /// JSON training config; flags below override its values
    #[arg(short, long, env = "CROPCAST_TRAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Input CSV dataset
    #[arg(short, long, env = "CROPCAST_DATA_PATH")]
    data: Option<PathBuf>,

    /// Output path for the model artifact
    #[arg(short, long, env = "CROPCAST_MODEL_PATH")]
    output: Option<PathBuf>,

    /// Directory for feature importance and prediction CSVs
    #[arg(long)]
    diagnostics_dir: Option<PathBuf>,

    /// Fraction of rows held out for evaluation
    #[arg(long)]
    test_size: Option<f64>,

    /// Seed for the split and the forest
    #[arg(long)]
    seed: Option<u64>,

    /// Number of trees
    #[arg(long)]
    n_trees: Option<usize>,

    /// Maximum tree depth
    #[arg(long)]
    max_depth: Option<u16>,
}

impl Cli {
    fn resolve(self) -> Result<TrainConfig> {
        let mut config = match &self.config {
            Some(path) => TrainConfig::load_from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => TrainConfig::default(),
        };

        if let Some(data) = self.data {
            config.data_path = data;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.diagnostics_dir.is_some() {
            config.diagnostics_dir = self.diagnostics_dir;
        }
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(n_trees) = self.n_trees {
            config.n_trees = n_trees;
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }

        config.validate()?;
        Ok(config)
    }
}

fn example_observation() -> Observation {
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

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = Cli::parse().resolve()?;

    info!("Loading dataset from {}", config.data_path.display());
    let dataset = Dataset::load_csv(&config.data_path)
        .with_context(|| format!("failed to read {}", config.data_path.display()))?;
    report::print_exploration(&dataset);

    let (observations, targets) = dataset.complete_rows();
    let dropped = dataset.records().len() - observations.len();
    if dropped > 0 {
        warn!("Dropped {} rows with missing values", dropped);
    }

    let options = TrainOptions {
        test_size: config.test_size,
        seed: config.seed,
        forest: ForestParams::new(config.n_trees, config.seed).with_max_depth(config.max_depth),
    };
    let outcome = train(&observations, &targets, &options)?;

    report::print_performance(&outcome.evaluation);
    report::print_importances(&outcome.importances);

    if let Some(dir) = &config.diagnostics_dir {
        for path in diagnostics::write(dir, &outcome.importances, &outcome.test_predictions)? {
            info!("Wrote {}", path.display());
        }
    }

    outcome.artifact.save(&config.output_path)?;
    info!(
        "Saved model {} to {}",
        outcome.artifact.model_id,
        config.output_path.display()
    );

    let example = outcome.artifact.predict(&example_observation())?;
    println!("\nExample Prediction: {:.4}", example);

    Ok(())
}
