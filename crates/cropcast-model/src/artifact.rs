//! Serialized model artifact written by the trainer and loaded by the server.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use cropcast_core::{Observation, YieldError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::baseline::BaselineConditions;
use crate::metrics::Evaluation;
use crate::pipeline::YieldPipeline;

/// Bumped whenever the artifact layout changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// A fitted pipeline plus the metadata needed to serve it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    /// Held-out metrics from the training run.
    pub evaluation: Option<Evaluation>,
    /// Values used to complete crop + NDVI queries.
    pub baseline: BaselineConditions,
    pub pipeline: YieldPipeline,
}

#[derive(Deserialize)]
struct ArtifactHeader {
    format_version: u32,
}

impl ModelArtifact {
    pub fn new(
        pipeline: YieldPipeline,
        baseline: BaselineConditions,
        evaluation: Option<Evaluation>,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            model_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            evaluation,
            baseline,
            pipeline,
        }
    }

    /// Writes the artifact as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), YieldError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads an artifact, rejecting other format versions before decoding
    /// the pipeline.
    pub fn load(path: &Path) -> Result<Self, YieldError> {
        let bytes = fs::read(path)?;

        let header: ArtifactHeader = serde_json::from_slice(&bytes)?;
        if header.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(YieldError::UnsupportedVersion {
                found: header.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Predicts the yield of a complete observation.
    pub fn predict(&self, observation: &Observation) -> Result<f64, YieldError> {
        let preds = self.pipeline.predict(&[observation.features()])?;
        preds
            .first()
            .copied()
            .ok_or_else(|| YieldError::Predict("model returned no prediction".into()))
    }
}
