//! Tests for box and label rendering.

mod common;

use std::path::Path;

use common::*;
use image::{ImageBuffer, RgbImage};
use shelfscan::label_text;

fn black_image(width: u32, height: u32) -> RgbImage {
    ImageBuffer::new(width, height)
}

#[test]
fn test_empty_detections_leave_image_unchanged() {
    let annotator = annotator();
    let original = create_test_frame();
    let mut image = original.clone();

    annotator.draw(&mut image, &[], Label::Product);
    annotator.draw(&mut image, &[], Label::PriceTag);

    assert_eq!(image, original);
}

#[test]
fn test_rectangle_outline_matches_box() {
    let annotator = annotator();
    let mut image = black_image(100, 100);

    annotator.draw(&mut image, &[detection(20.0, 30.0, 60.0, 70.0, 0.5)], Label::Product);

    // Outer ring on the box coordinates
    assert_eq!(*image.get_pixel(20, 30), GREEN);
    assert_eq!(*image.get_pixel(60, 70), GREEN);
    assert_eq!(*image.get_pixel(20, 50), GREEN);
    assert_eq!(*image.get_pixel(60, 50), GREEN);
    assert_eq!(*image.get_pixel(40, 30), GREEN);
    assert_eq!(*image.get_pixel(40, 70), GREEN);

    // Second ring of the 2px stroke
    assert_eq!(*image.get_pixel(21, 50), GREEN);
    assert_eq!(*image.get_pixel(40, 69), GREEN);

    // Interior and exterior untouched
    assert_eq!(image.get_pixel(40, 50).0, [0, 0, 0]);
    assert_eq!(image.get_pixel(23, 50).0, [0, 0, 0]);
    assert_eq!(image.get_pixel(18, 50).0, [0, 0, 0]);
    assert_eq!(image.get_pixel(62, 50).0, [0, 0, 0]);
}

#[test]
fn test_fractional_coordinates_are_truncated() {
    let annotator = annotator();
    let mut image = black_image(50, 50);

    annotator.draw(&mut image, &[detection(10.7, 10.2, 30.9, 30.5, 0.5)], Label::PriceTag);

    assert_eq!(*image.get_pixel(10, 10), RED);
    assert_eq!(*image.get_pixel(30, 30), RED);
    assert_eq!(image.get_pixel(20, 20).0, [0, 0, 0]);
}

#[test]
fn test_label_colors() {
    assert_eq!(Label::Product.color(), GREEN);
    assert_eq!(Label::PriceTag.color(), RED);
    assert_eq!(Label::Product.to_string(), "Product");
    assert_eq!(Label::PriceTag.to_string(), "PriceTag");
}

#[test]
fn test_drawing_accumulates() {
    let annotator = annotator();
    let products = [detection(5.0, 5.0, 40.0, 40.0, 0.9)];
    let tags = [detection(60.0, 50.0, 90.0, 90.0, 0.7)];

    let mut product_first = black_image(100, 100);
    annotator.draw(&mut product_first, &products, Label::Product);
    annotator.draw(&mut product_first, &tags, Label::PriceTag);

    // Both sets present
    assert_eq!(*product_first.get_pixel(5, 5), GREEN);
    assert_eq!(*product_first.get_pixel(60, 50), RED);

    let mut tags_first = black_image(100, 100);
    annotator.draw(&mut tags_first, &tags, Label::PriceTag);
    annotator.draw(&mut tags_first, &products, Label::Product);

    assert_eq!(product_first, tags_first);
}

#[test]
fn test_boxes_outside_image_are_clipped() {
    let annotator = annotator();
    let mut image = black_image(40, 40);

    let detections = [
        detection(-10.0, -10.0, 20.0, 20.0, 0.6),
        detection(30.0, 30.0, 80.0, 80.0, 0.6),
        detection(100.0, 100.0, 120.0, 120.0, 0.6),
        detection(0.0, 0.0, 40.0, 40.0, 0.6),
    ];
    annotator.draw(&mut image, &detections, Label::Product);

    assert_eq!(*image.get_pixel(20, 5), GREEN);
    assert_eq!(*image.get_pixel(30, 35), GREEN);
    assert_eq!(*image.get_pixel(0, 0), GREEN);
}

#[test]
fn test_degenerate_box_does_not_panic() {
    let annotator = annotator();
    let mut image = black_image(20, 20);

    annotator.draw(&mut image, &[detection(5.0, 5.0, 5.0, 5.0, 0.5)], Label::Product);

    assert_eq!(*image.get_pixel(5, 5), GREEN);
}

#[test]
fn test_label_text_rounds_to_two_decimals() {
    assert_eq!(label_text(Label::Product, 0.8675), "Product 0.87");
    assert_eq!(label_text(Label::PriceTag, 0.5), "PriceTag 0.50");
    assert!(label_text(Label::PriceTag, 0.8675).contains("0.87"));
}

#[test]
fn test_missing_font_is_artifact_missing() {
    let result = Annotator::with_font_file(Path::new("/nonexistent/font.ttf"));
    assert!(matches!(result, Err(PipelineError::ArtifactMissing { .. })));
}

#[test]
fn test_invalid_font_is_artifact_missing() -> anyhow::Result<()> {
    let file = tempfile::NamedTempFile::new()?;
    std::fs::write(file.path(), b"not a font")?;

    let result = Annotator::with_font_file(file.path());
    assert!(matches!(result, Err(PipelineError::ArtifactMissing { .. })));
    Ok(())
}

#[test]
fn test_default_annotator_draws_label_above_box() -> anyhow::Result<()> {
    let annotator = Annotator::new()?;

    let mut image = black_image(200, 120);
    annotator.draw(&mut image, &[detection(20.0, 60.0, 120.0, 110.0, 0.8675)], Label::Product);

    // Glyph pixels land in the band above the box
    let text_pixels = (0..200)
        .flat_map(|x| (0..58).map(move |y| (x, y)))
        .filter(|&(x, y)| image.get_pixel(x, y).0[1] > 0)
        .count();
    assert!(text_pixels > 0, "expected label text above the box");

    // Text stays in the label's color
    assert!(image.pixels().all(|p| p.0[0] == 0 && p.0[2] == 0));

    // Nothing drawn in the gap directly above the box
    assert!((0..200).all(|x| image.get_pixel(x, 55).0 == [0, 0, 0]));
    Ok(())
}

#[test]
fn test_label_text_starts_at_box_left_edge() -> anyhow::Result<()> {
    let annotator = Annotator::from_optional_font(None)?;

    let mut image = black_image(200, 120);
    annotator.draw(&mut image, &[detection(60.0, 60.0, 160.0, 110.0, 0.5)], Label::PriceTag);

    let left_of_box = (0..58).all(|y| (0..58).all(|x| image.get_pixel(x, y).0 == [0, 0, 0]));
    assert!(left_of_box, "label text should not extend left of the box");
    Ok(())
}

#[test]
fn test_font_override_is_used_for_labels() -> anyhow::Result<()> {
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/DejaVuSans.ttf");
    let annotator = Annotator::from_optional_font(Some(bundled.as_path()))?;

    let mut from_file = black_image(200, 120);
    annotator.draw(&mut from_file, &[detection(20.0, 60.0, 120.0, 110.0, 0.8675)], Label::Product);

    let mut built_in = black_image(200, 120);
    Annotator::new()?.draw(&mut built_in, &[detection(20.0, 60.0, 120.0, 110.0, 0.8675)], Label::Product);

    assert_eq!(from_file, built_in);
    Ok(())
}
