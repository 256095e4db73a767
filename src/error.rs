use std::path::PathBuf;

use thiserror::Error;

use crate::models::Label;

/// Failures raised by the object store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("permission denied: {bucket}/{key}")]
    PermissionDenied { bucket: String, key: String },

    #[error("invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("I/O error on {bucket}/{key}: {source}")]
    Io {
        bucket: String,
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Map an I/O error onto the store's error kinds.
    pub fn from_io(bucket: &str, key: &str, source: std::io::Error) -> Self {
        let (bucket, key) = (bucket.to_string(), key.to_string());
        match source.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound { bucket, key },
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied { bucket, key },
            _ => StorageError::Io { bucket, key, source },
        }
    }
}

/// Failures raised by a detector while running inference.
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected model output shape {shape:?}")]
    OutputShape { shape: Vec<usize> },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("artifact {path} could not be loaded: {reason}")]
    ArtifactMissing { path: PathBuf, reason: String },

    #[error("failed to decode image {key}: {reason}")]
    DecodeFailure { key: String, reason: String },

    #[error("failed to encode image {key}: {reason}")]
    Encode { key: String, reason: String },

    #[error("{label} detection failed for {filename}: {source}")]
    Detection {
        label: Label,
        filename: String,
        #[source]
        source: DetectError,
    },

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("failed to write debug output: {0}")]
    Debug(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
