use crate::domain::model::ClientRecord;
use crate::ml::regressor::FittedModel;
use crate::ml::selection::{CandidateScore, TrainingOutcome};
use crate::utils::error::{PremiumError, Result};
use aprender::format::{self, ModelType, SaveOptions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const METADATA_FORMAT_VERSION: u32 = 2;
pub const MODEL_EXTENSION: &str = "apr";
pub const METADATA_EXTENSION: &str = "json";

// 候選模型都是線性管線（dummy 只有截距）
const CONTAINER_TYPE: ModelType = ModelType::LinearRegression;

/// Where the two halves of an artifact live, relative to the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: String,
    pub metadata: String,
}

impl ArtifactPaths {
    /// `insurance_model` -> `insurance_model.apr` + `insurance_model.json`.
    pub fn for_model_path(model_path: &str) -> Self {
        let stem = Path::new(model_path)
            .with_extension("")
            .to_string_lossy()
            .to_string();
        Self {
            model: format!("{}.{}", stem, MODEL_EXTENSION),
            metadata: format!("{}.{}", stem, METADATA_EXTENSION),
        }
    }
}

/// Training run summary stored next to the model container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub format_version: u32,
    pub algorithm: String,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub leaderboard: Vec<CandidateScore>,
}

impl ModelMetadata {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let metadata: ModelMetadata = serde_json::from_slice(data).map_err(|e| {
            PremiumError::model_unavailable(format!("model metadata is not readable: {}", e))
        })?;

        if metadata.format_version != METADATA_FORMAT_VERSION {
            return Err(PremiumError::model_unavailable(format!(
                "unsupported model metadata version {} (expected {})",
                metadata.format_version, METADATA_FORMAT_VERSION
            )));
        }
        Ok(metadata)
    }
}

#[derive(Debug)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    model: FittedModel,
}

impl ModelArtifact {
    pub fn from_outcome(outcome: TrainingOutcome) -> Self {
        Self {
            metadata: ModelMetadata {
                format_version: METADATA_FORMAT_VERSION,
                algorithm: outcome.model.algorithm().to_string(),
                trained_at: Utc::now(),
                training_rows: outcome.training_rows,
                leaderboard: outcome.leaderboard,
            },
            model: outcome.model,
        }
    }

    /// Reads the model container and checks it against its metadata.
    pub fn load(metadata: ModelMetadata, model_file: &Path) -> Result<Self> {
        let model: FittedModel = format::load(model_file, CONTAINER_TYPE).map_err(|e| {
            PremiumError::model_unavailable(format!(
                "model file {} is not readable: {}",
                model_file.display(),
                e
            ))
        })?;

        if model.algorithm() != metadata.algorithm {
            return Err(PremiumError::model_unavailable(format!(
                "model file holds '{}' but metadata names '{}'",
                model.algorithm(),
                metadata.algorithm
            )));
        }

        Ok(Self { metadata, model })
    }

    pub fn save_model(&self, model_file: &Path) -> Result<()> {
        format::save(&self.model, CONTAINER_TYPE, model_file, SaveOptions::default()).map_err(
            |e| {
                PremiumError::model_unavailable(format!(
                    "failed to write model file {}: {}",
                    model_file.display(),
                    e
                ))
            },
        )
    }

    pub fn algorithm(&self) -> &str {
        &self.metadata.algorithm
    }

    pub fn predict(&self, record: &ClientRecord) -> Result<f64> {
        self.model.predict(record)
    }
}
