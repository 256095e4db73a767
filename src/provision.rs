use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::PipelineError;
use crate::storage::ObjectStore;

/// Copies model weights from a model bucket into a local directory.
///
/// An artifact already present locally is left alone, so warm starts do no I/O
/// beyond an existence check.
pub struct ModelProvisioner<'a, S: ObjectStore> {
    store: &'a S,
    model_bucket: String,
    models_dir: PathBuf,
}

impl<'a, S: ObjectStore> ModelProvisioner<'a, S> {
    pub fn new(store: &'a S, model_bucket: impl Into<String>, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            model_bucket: model_bucket.into(),
            models_dir: models_dir.into(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Make `artifact` available locally and return its path
    pub async fn ensure(&self, artifact: &str) -> Result<PathBuf, PipelineError> {
        let local_path = self.models_dir.join(artifact);
        let missing = |reason: String| PipelineError::ArtifactMissing {
            path: local_path.clone(),
            reason,
        };

        let present = tokio::fs::try_exists(&local_path)
            .await
            .map_err(|e| missing(e.to_string()))?;
        if present {
            debug!(artifact, path = %local_path.display(), "model already provisioned");
            return Ok(local_path);
        }

        let bytes = self
            .store
            .get(&self.model_bucket, artifact)
            .await
            .map_err(|e| missing(e.to_string()))?;

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| missing(e.to_string()))?;
        }
        tokio::fs::write(&local_path, &bytes)
            .await
            .map_err(|e| missing(e.to_string()))?;

        info!(
            artifact,
            bucket = %self.model_bucket,
            size = bytes.len(),
            "downloaded model artifact"
        );
        Ok(local_path)
    }
}
