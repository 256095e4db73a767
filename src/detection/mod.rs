pub mod postprocess;
pub mod preprocessing;
pub mod yolo;

use image::RgbImage;

use crate::error::DetectError;
use crate::models::Detection;

pub use yolo::YoloDetector;

/// A loaded object detector.
///
/// Implementations are constructed once and shared across invocations, so
/// `detect` must not depend on per-call mutable state.
pub trait Detector: Send + Sync {
    /// Locate objects in `image`. No qualifying objects is an empty set, not an error.
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, DetectError>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}
