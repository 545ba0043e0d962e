use crate::domain::model::ClientRecord;
use crate::domain::ports::{ChargeModel, ConfigProvider, DatasetSource, Storage};
use crate::ml::artifact::{ArtifactPaths, ModelArtifact, ModelMetadata};
use crate::ml::selection::{compare_models, SetupOptions};
use crate::utils::error::{PremiumError, Result};
use std::sync::Arc;

/// Read-only handle to a trained model, shared for the rest of the process.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    artifact: Arc<ModelArtifact>,
}

impl ModelHandle {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self {
            artifact: Arc::new(artifact),
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.artifact.metadata
    }
}

impl ChargeModel for ModelHandle {
    fn algorithm(&self) -> &str {
        self.artifact.algorithm()
    }

    fn predict(&self, record: &ClientRecord) -> Result<f64> {
        let value = self
            .artifact
            .predict(record)
            .map_err(|e| as_model_unavailable("prediction failed", e))?;
        if !value.is_finite() {
            return Err(PremiumError::model_unavailable(format!(
                "model '{}' returned a non-finite prediction",
                self.algorithm()
            )));
        }
        Ok(value)
    }
}

fn as_model_unavailable(context: &str, err: PremiumError) -> PremiumError {
    match err {
        PremiumError::ModelUnavailable { .. } => err,
        other => PremiumError::model_unavailable(format!("{}: {}", context, other)),
    }
}

pub struct ModelStore<S: Storage> {
    storage: S,
    paths: ArtifactPaths,
    options: SetupOptions,
}

impl<S: Storage> ModelStore<S> {
    pub fn new(storage: S, model_path: &str, options: SetupOptions) -> Self {
        Self {
            storage,
            paths: ArtifactPaths::for_model_path(model_path),
            options,
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, config: &C) -> Self {
        Self::new(
            storage,
            config.model_path(),
            SetupOptions {
                session_id: config.session_id(),
                train_fraction: config.train_fraction(),
            },
        )
    }

    /// Path of the model container, relative to the storage root.
    pub fn artifact_path(&self) -> &str {
        &self.paths.model
    }

    pub async fn exists(&self) -> bool {
        self.storage.exists(&self.paths.model).await
            && self.storage.exists(&self.paths.metadata).await
    }

    pub async fn load(&self) -> Result<ModelHandle> {
        let bytes = self
            .storage
            .read_file(&self.paths.metadata)
            .await
            .map_err(|e| as_model_unavailable("failed to read model metadata", e))?;
        let metadata = ModelMetadata::from_bytes(&bytes)?;
        let artifact = ModelArtifact::load(metadata, &self.storage.local_path(&self.paths.model))?;

        tracing::info!(
            "📦 Loaded model '{}' trained at {} from {}",
            artifact.algorithm(),
            artifact.metadata.trained_at,
            self.paths.model
        );
        Ok(ModelHandle::new(artifact))
    }

    /// Trains on the reference dataset and overwrites the stored artifact.
    pub async fn train<D: DatasetSource + ?Sized>(&self, dataset: &D) -> Result<ModelHandle> {
        tracing::info!("🧠 Training model from {}", dataset.describe());

        let samples = dataset
            .load()
            .await
            .map_err(|e| as_model_unavailable("failed to load training dataset", e))?;
        tracing::debug!("Loaded {} training rows", samples.len());

        let outcome = compare_models(&samples, &self.options)?;
        let artifact = ModelArtifact::from_outcome(outcome);

        let model_file = self.storage.local_path(&self.paths.model);
        if let Some(parent) = model_file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| as_model_unavailable("failed to create model directory", e.into()))?;
        }
        artifact.save_model(&model_file)?;

        let bytes = artifact
            .metadata
            .to_bytes()
            .map_err(|e| as_model_unavailable("failed to serialize model metadata", e))?;
        self.storage
            .write_file(&self.paths.metadata, &bytes)
            .await
            .map_err(|e| as_model_unavailable("failed to save model metadata", e))?;

        tracing::info!(
            "💾 Model '{}' saved to {}",
            artifact.algorithm(),
            self.paths.model
        );
        Ok(ModelHandle::new(artifact))
    }

    /// Loads the artifact when present, otherwise trains and persists a new one.
    pub async fn load_or_train<D: DatasetSource + ?Sized>(&self, dataset: &D) -> Result<ModelHandle> {
        if self.exists().await {
            self.load().await
        } else {
            tracing::info!("No model artifact at {}, training a new one", self.paths.model);
            self.train(dataset).await
        }
    }
}
