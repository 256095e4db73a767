use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use image::{ImageFormat, ImageReader, RgbImage};
use tracing::debug;

use crate::error::{PipelineError, StorageError};

/// Bucket/key addressed object storage.
///
/// Failures are reported as-is; implementations do not retry.
pub trait ObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError>;
}

/// Object store backed by a directory tree: `root/<bucket>/<key>`
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object to a file path, rejecting keys that leave the bucket
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        let invalid = |name: &str, reason: &str| StorageError::InvalidKey {
            key: name.to_string(),
            reason: reason.to_string(),
        };

        check_relative(bucket).map_err(|reason| invalid(bucket, reason))?;
        if bucket.contains('/') {
            return Err(invalid(bucket, "bucket names cannot contain '/'"));
        }
        check_relative(key).map_err(|reason| invalid(key, reason))?;

        Ok(self.root.join(bucket).join(key))
    }
}

fn check_relative(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("empty name");
    }
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err("parent directory references are not allowed"),
            Component::RootDir | Component::Prefix(_) => return Err("absolute paths are not allowed"),
        }
    }
    Ok(())
}

impl ObjectStore for LocalObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(bucket, key)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| StorageError::from_io(bucket, key, e))?;
        debug!(bucket, key, size = bytes.len(), "fetched object");
        Ok(bytes)
    }

    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io(bucket, key, e))?;
        }
        let size = bytes.len();
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::from_io(bucket, key, e))?;
        debug!(bucket, key, size, "stored object");
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        let path = self.object_path(bucket, key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::from_io(bucket, key, e))
    }
}

/// Decode raw object bytes into an RGB raster, sniffing the format from content
pub fn decode_image(key: &str, bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    let failure = |reason: String| PipelineError::DecodeFailure {
        key: key.to_string(),
        reason,
    };

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| failure(e.to_string()))?
        .decode()
        .map_err(|e| failure(e.to_string()))?;

    Ok(img.to_rgb8())
}

/// Encode an image using the format implied by `filename`, PNG when unknown
pub fn encode_image(image: &RgbImage, filename: &str) -> Result<Vec<u8>, PipelineError> {
    let format = output_format(filename);
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .map_err(|e| PipelineError::Encode {
            key: filename.to_string(),
            reason: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}

/// Format used to encode an output object
pub fn output_format(filename: &str) -> ImageFormat {
    match ImageFormat::from_path(filename) {
        Ok(format) if format.writing_enabled() && writes_rgb8(format) => format,
        _ => ImageFormat::Png,
    }
}

fn writes_rgb8(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Jpeg
            | ImageFormat::Bmp
            | ImageFormat::Tiff
            | ImageFormat::WebP
            | ImageFormat::Pnm
            | ImageFormat::Tga
            | ImageFormat::Qoi
    )
}
