use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Side length of the square network input
pub const INPUT_SIZE: u32 = 640;

/// Padding color used around the resized image
pub const PAD_VALUE: u8 = 114;

/// Geometry of a letterboxed image, used to map model coordinates back to the source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub source_width: u32,
    pub source_height: u32,
}

impl Letterbox {
    /// Compute the letterbox geometry for a source image of the given size
    pub fn for_size(source_width: u32, source_height: u32, target: u32) -> Self {
        let scale = (target as f32 / source_width as f32).min(target as f32 / source_height as f32);
        let scaled_w = (source_width as f32 * scale).round();
        let scaled_h = (source_height as f32 * scale).round();

        Self {
            scale,
            pad_x: ((target as f32 - scaled_w) / 2.0).floor(),
            pad_y: ((target as f32 - scaled_h) / 2.0).floor(),
            source_width,
            source_height,
        }
    }

    /// Map an x coordinate from network input space to source space
    pub fn unmap_x(&self, x: f32) -> f32 {
        (x - self.pad_x) / self.scale
    }

    /// Map a y coordinate from network input space to source space
    pub fn unmap_y(&self, y: f32) -> f32 {
        (y - self.pad_y) / self.scale
    }
}

/// Resize while keeping aspect ratio and center on a padded square canvas
pub fn letterbox(img: &RgbImage, target: u32) -> (RgbImage, Letterbox) {
    let (width, height) = img.dimensions();
    let geometry = Letterbox::for_size(width, height, target);

    let scaled_w = ((width as f32 * geometry.scale).round() as u32).clamp(1, target);
    let scaled_h = ((height as f32 * geometry.scale).round() as u32).clamp(1, target);
    let scaled = imageops::resize(img, scaled_w, scaled_h, FilterType::Triangle);

    let mut canvas = RgbImage::from_pixel(target, target, Rgb([PAD_VALUE; 3]));
    imageops::overlay(&mut canvas, &scaled, geometry.pad_x as i64, geometry.pad_y as i64);

    (canvas, geometry)
}

/// Convert an RGB image into planar (CHW) floats scaled to [0, 1]
pub fn to_chw(img: &RgbImage) -> Vec<f32> {
    let (width, height) = img.dimensions();
    let plane = (width * height) as usize;
    let mut data = vec![0.0f32; 3 * plane];

    for (x, y, pixel) in img.enumerate_pixels() {
        let offset = (y * width + x) as usize;
        for channel in 0..3 {
            data[channel * plane + offset] = pixel[channel] as f32 / 255.0;
        }
    }

    data
}
