use std::cmp::Ordering;

use crate::detection::preprocessing::Letterbox;
use crate::error::DetectError;
use crate::models::{BoundingBox, Detection};

/// Minimum class score for a candidate to be kept
pub const CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Overlap above which the weaker of two same-class boxes is suppressed
pub const IOU_THRESHOLD: f32 = 0.7;

/// Upper bound on detections returned per image
pub const MAX_DETECTIONS: usize = 300;

/// Validate a `[batch, 4 + classes, anchors]` output shape and return
/// `(rows, anchors)`. Only single-image batches with at least one class are
/// accepted.
pub fn prediction_dims(shape: &[usize]) -> Result<(usize, usize), DetectError> {
    match *shape {
        [1, rows, anchors] if rows > 4 => Ok((rows, anchors)),
        _ => Err(DetectError::OutputShape {
            shape: shape.to_vec(),
        }),
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    bbox: BoundingBox,
    confidence: f32,
    class_id: usize,
}

/// Decode a raw YOLO prediction matrix into detections in source coordinates.
///
/// `raw` is row-major `[rows][anchors]` where rows 0..4 hold center x, center y,
/// width and height in network input pixels and the remaining rows hold one
/// score per class.
pub fn decode_predictions(
    raw: &[f32],
    rows: usize,
    anchors: usize,
    geometry: &Letterbox,
) -> Vec<Detection> {
    if rows <= 4 || raw.len() < rows * anchors {
        return Vec::new();
    }
    let num_classes = rows - 4;
    let at = |row: usize, anchor: usize| raw[row * anchors + anchor];

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let (class_id, confidence) = (0..num_classes)
            .map(|class| (class, at(4 + class, anchor)))
            .fold((0, f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });

        if !confidence.is_finite() || confidence < CONFIDENCE_THRESHOLD {
            continue;
        }

        let bbox = BoundingBox::from_center(
            at(0, anchor),
            at(1, anchor),
            at(2, anchor),
            at(3, anchor),
        );
        candidates.push(Candidate {
            bbox,
            confidence: confidence.min(1.0),
            class_id,
        });
    }

    non_max_suppression(candidates)
        .into_iter()
        .map(|c| {
            let bbox = BoundingBox::new(
                geometry.unmap_x(c.bbox.x1),
                geometry.unmap_y(c.bbox.y1),
                geometry.unmap_x(c.bbox.x2),
                geometry.unmap_y(c.bbox.y2),
            )
            .clamp_to(geometry.source_width, geometry.source_height);
            Detection::new(bbox, c.confidence)
        })
        .collect()
}

/// Greedy per-class NMS, highest confidence first
fn non_max_suppression(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && k.bbox.iou(&candidate.bbox) > IOU_THRESHOLD
        });
        if !suppressed {
            kept.push(candidate);
            if kept.len() == MAX_DETECTIONS {
                break;
            }
        }
    }
    kept
}
