//! Storage notification events.
//!
//! Only the fields the pipeline reads are modeled; everything else in the
//! notification payload is ignored.

use serde::Deserialize;

use crate::error::PipelineError;

#[derive(Debug, Clone, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    pub key: String,
}

/// Location of the object that triggered an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl S3Event {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(json).map_err(|e| PipelineError::InvalidEvent(e.to_string()))
    }

    /// The object named by the first record; later records are not processed
    pub fn first_object(&self) -> Result<ObjectRef, PipelineError> {
        let record = self
            .records
            .first()
            .ok_or_else(|| PipelineError::InvalidEvent("event contains no records".to_string()))?;

        Ok(ObjectRef {
            bucket: record.s3.bucket.name.clone(),
            key: decode_object_key(&record.s3.object.key)?,
        })
    }
}

/// Notification keys are form-encoded: spaces arrive as `+`, the rest percent-escaped
pub fn decode_object_key(raw: &str) -> Result<String, PipelineError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| PipelineError::InvalidEvent(format!("bad object key '{}': {}", raw, e)))
}
