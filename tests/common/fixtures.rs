#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ImageBuffer, Rgb, RgbImage};
use shelfscan::error::DetectError;
use shelfscan::{Annotator, BoundingBox, Detection, Detector, PipelineOrchestrator};

/// Frame name in the naming scheme the uploader uses
pub const FRAME_NAME: &str = "chips-t4K_t00006500_var887_hq.jpg";

/// Same frame stored losslessly so pixels can be checked after a round trip
pub const FRAME_NAME_PNG: &str = "chips-t4K_t00006500_var887_hq.png";

pub const BACKGROUND: Rgb<u8> = Rgb([50, 50, 50]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Detector returning a fixed set of detections and counting its calls
pub struct StubDetector {
    name: String,
    detections: Vec<Detection>,
    calls: Arc<AtomicUsize>,
}

impl StubDetector {
    pub fn new(name: &str, detections: Vec<Detection>) -> Self {
        Self {
            name: name.to_string(),
            detections,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn empty(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    /// Shared handle to the call counter
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl Detector for StubDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<Detection>, DetectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.detections.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Detector whose inference always fails
pub struct FailingDetector;

impl Detector for FailingDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<Detection>, DetectError> {
        Err(DetectError::Inference("simulated failure".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub fn detection(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Detection {
    Detection::new(BoundingBox::new(x1, y1, x2, y2), confidence)
}

/// Box used for Product in pipeline tests
pub fn product_detection() -> Detection {
    detection(10.0, 10.0, 50.0, 50.0, 0.91)
}

/// Box used for PriceTag in pipeline tests, disjoint from the product box
pub fn price_tag_detection() -> Detection {
    detection(100.0, 20.0, 150.0, 60.0, 0.8675)
}

/// Uniform 200x100 test frame
pub fn create_test_frame() -> RgbImage {
    ImageBuffer::from_pixel(200, 100, BACKGROUND)
}

/// PNG bytes of the test frame
pub fn test_frame_png() -> Vec<u8> {
    shelfscan::storage::encode_image(&create_test_frame(), FRAME_NAME_PNG)
        .expect("Failed to encode test frame")
}

/// Annotator with the built-in label font
pub fn annotator() -> Annotator {
    Annotator::new().expect("Failed to load built-in font")
}

/// Orchestrator over the given detectors with the built-in font
pub fn orchestrator_with(product: impl Detector + 'static, price_tag: impl Detector + 'static) -> PipelineOrchestrator {
    PipelineOrchestrator::new(Arc::new(product), Arc::new(price_tag), annotator())
}

/// Orchestrator with one product box and one price tag box
pub fn make_orchestrator() -> PipelineOrchestrator {
    orchestrator_with(
        StubDetector::new("product-stub", vec![product_detection()]),
        StubDetector::new("price-stub", vec![price_tag_detection()]),
    )
}
