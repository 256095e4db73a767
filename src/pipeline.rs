use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbImage;
use tracing::{debug, info};

use crate::annotate::Annotator;
use crate::detection::Detector;
use crate::error::{PipelineError, Result};
use crate::grouping::{group_key, output_key};
use crate::models::{AnnotatedImage, Detection, Label};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for stage images
    pub output_dir: PathBuf,
}

/// One detection pass: a detector and the label its boxes are drawn with
#[derive(Clone)]
pub struct DetectionPass {
    pub label: Label,
    pub detector: Arc<dyn Detector>,
}

/// Runs both detectors over a frame and renders their results.
///
/// Detectors are injected and shared; the orchestrator itself holds no
/// per-invocation state, so one instance can serve concurrent invocations.
pub struct PipelineOrchestrator {
    passes: Vec<DetectionPass>,
    annotator: Annotator,
    debug: Option<DebugConfig>,
}

impl PipelineOrchestrator {
    /// Orchestrator with the Product pass followed by the PriceTag pass
    pub fn new(product: Arc<dyn Detector>, price_tag: Arc<dyn Detector>, annotator: Annotator) -> Self {
        Self {
            passes: vec![
                DetectionPass {
                    label: Label::Product,
                    detector: product,
                },
                DetectionPass {
                    label: Label::PriceTag,
                    detector: price_tag,
                },
            ],
            annotator,
            debug: None,
        }
    }

    /// Enable debug mode with output directory.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)
                .map_err(|e| PipelineError::Debug(e.to_string()))?;
            if entries.count() > 0 {
                return Err(PipelineError::Debug(format!(
                    "debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir).map_err(|e| PipelineError::Debug(e.to_string()))?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Detect, annotate and compute the output key for one frame.
    ///
    /// All detection passes run before any drawing. The source image is cloned
    /// once; every pass draws onto that working copy.
    pub fn process(&self, source: &RgbImage, filename: &str) -> Result<AnnotatedImage> {
        info!(
            filename,
            width = source.width(),
            height = source.height(),
            "processing frame"
        );
        self.save_debug_output(0, "input", filename, source)?;

        let mut results: Vec<(Label, Vec<Detection>)> = Vec::with_capacity(self.passes.len());
        for pass in &self.passes {
            let detections =
                pass.detector
                    .detect(source)
                    .map_err(|source| PipelineError::Detection {
                        label: pass.label,
                        filename: filename.to_string(),
                        source,
                    })?;
            debug!(
                label = %pass.label,
                detector = pass.detector.name(),
                count = detections.len(),
                "detection pass complete"
            );
            results.push((pass.label, detections));
        }

        let mut annotated = source.clone();
        for (idx, (label, detections)) in results.iter().enumerate() {
            self.annotator.draw(&mut annotated, detections, *label);
            let stage = label.name().to_lowercase();
            self.save_debug_output(idx + 1, &stage, filename, &annotated)?;
        }

        let count = |wanted: Label| -> usize {
            results
                .iter()
                .filter(|(label, _)| *label == wanted)
                .map(|(_, d)| d.len())
                .sum()
        };

        let group_key = group_key(filename);
        let output_key = output_key(filename);
        info!(%group_key, %output_key, "frame annotated");

        Ok(AnnotatedImage {
            image: annotated,
            group_key,
            output_key,
            product_count: count(Label::Product),
            price_tag_count: count(Label::PriceTag),
        })
    }

    /// Save a stage image in debug mode, e.g. `01_product/frame.png`
    fn save_debug_output(
        &self,
        step_index: usize,
        step_name: &str,
        filename: &str,
        image: &RgbImage,
    ) -> Result<()> {
        let Some(debug_config) = &self.debug else {
            return Ok(());
        };

        let step_dir_name = format!("{:02}_{}", step_index, step_name);
        let step_dir = debug_config.output_dir.join(&step_dir_name);
        std::fs::create_dir_all(&step_dir).map_err(|e| PipelineError::Debug(e.to_string()))?;

        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("frame");
        let output_path = step_dir.join(format!("{}.png", stem));
        image
            .save(&output_path)
            .map_err(|e| PipelineError::Debug(format!("failed to save {}: {}", output_path.display(), e)))?;

        debug!("saved {}/{}.png", step_dir_name, stem);
        Ok(())
    }
}
