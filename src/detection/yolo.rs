use std::path::{Path, PathBuf};

use image::RgbImage;
use rten::Model;
use rten_tensor::NdTensor;
use rten_tensor::prelude::*;
use tracing::{debug, info};

use crate::detection::Detector;
use crate::detection::postprocess::{decode_predictions, prediction_dims};
use crate::detection::preprocessing::{INPUT_SIZE, letterbox, to_chw};
use crate::error::{DetectError, PipelineError};
use crate::models::Detection;

/// YOLO-style detector running an exported `.rten` model
pub struct YoloDetector {
    name: String,
    model: Model,
    input_size: u32,
}

impl YoloDetector {
    /// Load weights from `path`.
    ///
    /// This is the only fallible step of a detector's life; a missing or
    /// corrupt file is reported as [`PipelineError::ArtifactMissing`].
    pub fn load(name: impl Into<String>, path: &Path) -> Result<Self, PipelineError> {
        let name = name.into();
        if !path.exists() {
            return Err(PipelineError::ArtifactMissing {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }

        let model = Model::load_file(path).map_err(|e| PipelineError::ArtifactMissing {
            path: PathBuf::from(path),
            reason: e.to_string(),
        })?;

        info!(detector = %name, path = %path.display(), "loaded detection model");

        Ok(Self {
            name,
            model,
            input_size: INPUT_SIZE,
        })
    }
}

impl Detector for YoloDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, DetectError> {
        let size = self.input_size as usize;
        let (input_image, geometry) = letterbox(image, self.input_size);
        let input = NdTensor::from_data([1, 3, size, size], to_chw(&input_image));

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| DetectError::Inference(e.to_string()))?;
        let output: NdTensor<f32, 3> = output
            .try_into()
            .map_err(|e| DetectError::Inference(format!("{:?}", e)))?;

        let (rows, anchors) = prediction_dims(&[output.size(0), output.size(1), output.size(2)])?;

        let detections = decode_predictions(&output.to_vec(), rows, anchors, &geometry);
        debug!(detector = %self.name, count = detections.len(), "inference complete");

        Ok(detections)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
