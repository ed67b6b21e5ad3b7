//! OCR detection input model
//!
//! The pipeline consumes detections produced by an external OCR engine
//! (PaddleOCR, EasyOCR, Tesseract, ...). Only the engine output is modeled
//! here; invoking or configuring an engine is out of scope.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Error decoding a detection dump
#[derive(Debug, Error)]
pub enum InputError {
    /// The document was not valid JSON at all
    #[error("invalid detection JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but held no detection list
    #[error("no detection list found in document")]
    MissingDetections,
}

/// A single OCR-recognized text span with location and confidence
#[derive(Debug, Clone, Deserialize)]
pub struct Detection {
    /// Recognized text
    pub text: String,
    /// Recognition confidence (0.0 - 1.0); engines without per-span
    /// confidence omit the field and get 1.0
    #[serde(default = "full_confidence")]
    pub confidence: f32,
    /// Bounding box; detections without one are excluded from clustering
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

fn full_confidence() -> f32 {
    1.0
}

impl Detection {
    /// Center of the bounding box, or `None` when the box is missing
    /// or degenerate
    pub fn center(&self) -> Option<(f32, f32)> {
        self.bbox.as_ref().and_then(BoundingBox::center)
    }
}

/// Bounding box in either of the two wire forms the OCR engines emit
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BoundingBox {
    /// Four corner points `[[x, y]; 4]` (PaddleOCR / EasyOCR)
    Quad([[f32; 2]; 4]),
    /// Axis-aligned `[x1, y1, x2, y2]` (Tesseract)
    Rect([f32; 4]),
}

impl BoundingBox {
    /// Center point, or `None` for a box with non-finite coordinates
    pub fn center(&self) -> Option<(f32, f32)> {
        let (cx, cy) = match self {
            BoundingBox::Quad(points) => {
                let n = points.len() as f32;
                let sx: f32 = points.iter().map(|p| p[0]).sum();
                let sy: f32 = points.iter().map(|p| p[1]).sum();
                (sx / n, sy / n)
            }
            BoundingBox::Rect([x1, y1, x2, y2]) => ((x1 + x2) / 2.0, (y1 + y2) / 2.0),
        };
        if cx.is_finite() && cy.is_finite() {
            Some((cx, cy))
        } else {
            None
        }
    }
}

/// Decode a detection dump from JSON.
///
/// Accepts either a bare array of detections or an object carrying an
/// `extracted_texts` array (the shape the OCR test harnesses write).
/// Individual elements that fail to decode are skipped with a warning;
/// only a structurally invalid document is an error.
pub fn parse_detections(json: &str) -> Result<Vec<Detection>, InputError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let elements = match &value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(map) => map
            .get("extracted_texts")
            .and_then(|v| v.as_array())
            .map(|v| v.as_slice())
            .ok_or(InputError::MissingDetections)?,
        _ => return Err(InputError::MissingDetections),
    };

    let mut detections = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        match Detection::deserialize(element) {
            Ok(d) => detections.push(d),
            Err(e) => warn!("skipping detection {}: {}", i, e),
        }
    }
    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_center() {
        let bbox = BoundingBox::Quad([[0.0, 0.0], [10.0, 0.0], [10.0, 4.0], [0.0, 4.0]]);
        assert_eq!(bbox.center(), Some((5.0, 2.0)));
    }

    #[test]
    fn test_rect_center() {
        let bbox = BoundingBox::Rect([2.0, 2.0, 6.0, 10.0]);
        assert_eq!(bbox.center(), Some((4.0, 6.0)));
    }

    #[test]
    fn test_non_finite_box_has_no_center() {
        let bbox = BoundingBox::Rect([f32::NAN, 0.0, 4.0, 4.0]);
        assert_eq!(bbox.center(), None);
    }

    #[test]
    fn test_missing_bbox_has_no_center() {
        let det: Detection = serde_json::from_str(r#"{"text": "CL"}"#).unwrap();
        assert_eq!(det.center(), None);
        assert!((det.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_bare_array() {
        let json = r#"[
            {"text": "13-17", "confidence": 0.93, "bbox": [10, 20, 60, 40]},
            {"text": "CL", "confidence": 0.88, "bbox": [[70, 20], [110, 20], [110, 40], [70, 40]]}
        ]"#;
        let detections = parse_detections(json).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].text, "13-17");
        assert!(matches!(detections[1].bbox, Some(BoundingBox::Quad(_))));
    }

    #[test]
    fn test_parse_extracted_texts_object() {
        let json = r#"{"extracted_texts": [
            {"text": "김서정", "confidence": 0.91, "bbox": [5, 100, 80, 130]}
        ]}"#;
        let detections = parse_detections(json).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].text, "김서정");
    }

    #[test]
    fn test_bad_elements_are_skipped() {
        let json = r#"[
            {"text": "ok", "bbox": [0, 0, 4, 4]},
            {"bbox": [0, 0, 4, 4]},
            42
        ]"#;
        let detections = parse_detections(json).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].text, "ok");
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        assert!(parse_detections("not json").is_err());
        assert!(matches!(
            parse_detections(r#"{"other": 1}"#),
            Err(InputError::MissingDetections)
        ));
    }
}
