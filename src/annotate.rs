use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::error::PipelineError;
use crate::models::{Detection, Label};

/// Outline width in pixels
pub const STROKE_WIDTH: i32 = 2;

/// Gap between the text baseline and the top of the box
pub const LABEL_OFFSET: i32 = 10;

/// Font height used for labels
pub const LABEL_SCALE: f32 = 18.0;

/// Label font compiled into the binary (DejaVu Sans)
const DEFAULT_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const DEFAULT_FONT_PATH: &str = "assets/DejaVuSans.ttf";

/// Text drawn next to a box, e.g. `Product 0.87`
pub fn label_text(label: Label, confidence: f32) -> String {
    format!("{} {:.2}", label, confidence)
}

/// Draws detection boxes and labels onto images.
///
/// `draw` mutates the image it is given; callers that must keep the source
/// intact clone it once and chain every `draw` on the copy.
pub struct Annotator {
    font: FontArc,
}

impl Annotator {
    /// Annotator using the built-in label font
    pub fn new() -> Result<Self, PipelineError> {
        let font = FontArc::try_from_slice(DEFAULT_FONT).map_err(|e| PipelineError::ArtifactMissing {
            path: PathBuf::from(DEFAULT_FONT_PATH),
            reason: e.to_string(),
        })?;
        Ok(Self::with_font(font))
    }

    pub fn with_font(font: FontArc) -> Self {
        Self { font }
    }

    /// Load a TrueType/OpenType font to use instead of the built-in one
    pub fn with_font_file(path: &Path) -> Result<Self, PipelineError> {
        let missing = |reason: String| PipelineError::ArtifactMissing {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = std::fs::read(path).map_err(|e| missing(e.to_string()))?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| missing(e.to_string()))?;
        Ok(Self::with_font(font))
    }

    /// Built-in font unless `path` overrides it
    pub fn from_optional_font(path: Option<&Path>) -> Result<Self, PipelineError> {
        match path {
            Some(path) => Self::with_font_file(path),
            None => Self::new(),
        }
    }

    /// Draw every detection in input order using the label's style
    pub fn draw(&self, image: &mut RgbImage, detections: &[Detection], label: Label) {
        let color = label.color();
        for detection in detections {
            let (x1, y1, x2, y2) = detection.bbox.pixel_corners();
            draw_box(image, x1, y1, x2, y2, color);

            let text = label_text(label, detection.confidence);
            let scale = PxScale::from(LABEL_SCALE);
            let (_, text_height) = text_size(scale, &self.font, &text);
            let top = y1 - LABEL_OFFSET - text_height as i32;
            for dx in 0..STROKE_WIDTH {
                draw_text_mut(image, color, x1 + dx, top, scale, &self.font, &text);
            }
        }
    }
}

/// Unfilled rectangle from (x1, y1) to (x2, y2) inclusive, drawn inward
fn draw_box(image: &mut RgbImage, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb<u8>) {
    for inset in 0..STROKE_WIDTH {
        let width = x2 - x1 + 1 - 2 * inset;
        let height = y2 - y1 + 1 - 2 * inset;
        if width <= 0 || height <= 0 {
            break;
        }
        let rect = Rect::at(x1 + inset, y1 + inset).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(image, rect, color);
    }
}
