use std::fmt;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Bounding box in source image pixel coordinates (corner form).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a corner-form box from a center point and size
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x1: cx - width / 2.0,
            y1: cy - height / 2.0,
            x2: cx + width / 2.0,
            y2: cy + height / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over union with another box
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }

    /// Clamp the box into `[0, width] x [0, height]`, keeping x1 <= x2 and y1 <= y2
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let x1 = self.x1.clamp(0.0, w);
        let y1 = self.y1.clamp(0.0, h);
        Self {
            x1,
            y1,
            x2: self.x2.clamp(x1, w),
            y2: self.y2.clamp(y1, h),
        }
    }

    /// Integer pixel corners, truncated toward zero
    pub fn pixel_corners(&self) -> (i32, i32, i32, i32) {
        (self.x1 as i32, self.y1 as i32, self.x2 as i32, self.y2 as i32)
    }
}

/// One located object. The class is implied by the detector that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, confidence: f32) -> Self {
        Self { bbox, confidence }
    }
}

/// The two object classes the pipeline renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Product,
    PriceTag,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Product, Label::PriceTag];

    pub fn name(&self) -> &'static str {
        match self {
            Label::Product => "Product",
            Label::PriceTag => "PriceTag",
        }
    }

    /// Outline and text color
    pub fn color(&self) -> Rgb<u8> {
        match self {
            Label::Product => Rgb([0, 255, 0]),
            Label::PriceTag => Rgb([255, 0, 0]),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of one orchestrator run
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub image: RgbImage,
    pub group_key: String,
    pub output_key: String,
    pub product_count: usize,
    pub price_tag_count: usize,
}

/// Invocation result handed back to the event source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub status_code: u16,
    pub body: String,
    /// Where the frame was written; not part of the wire shape
    #[serde(skip)]
    pub output_key: String,
}

impl PipelineResult {
    pub fn saved(output_bucket: &str, output_key: &str) -> Self {
        Self {
            status_code: 200,
            body: format!("Annotated image saved to {}/{}", output_bucket, output_key),
            output_key: output_key.to_string(),
        }
    }
}
