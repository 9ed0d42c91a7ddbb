//! Recognized text fragments and the geometric layout analysis on top of them.

mod layout;

pub use layout::{Column, Row, RowLayout, Token, TokenOrder, cluster_columns, cluster_rows, row_tokens};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{InputError, Result};

/// A point `[x, y]` in image coordinates.
pub type Point = [f32; 2];

/// A recognized text fragment with its quadrilateral bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputItem {
    /// Recognized text content.
    pub text: String,

    /// Corner points, clockwise from the top-left one.
    #[serde(rename = "box")]
    pub bbox: [Point; 4],

    /// Recognition confidence, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl InputItem {
    pub fn new(text: impl Into<String>, bbox: [Point; 4]) -> Self {
        Self {
            text: text.into(),
            bbox,
            score: None,
        }
    }

    /// Build an item from an axis-aligned rectangle.
    pub fn from_rect(text: impl Into<String>, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(text, [[x1, y1], [x2, y1], [x2, y2], [x1, y2]])
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        (self.center_x(), self.center_y())
    }

    pub fn center_x(&self) -> f32 {
        self.bbox.iter().map(|p| p[0]).sum::<f32>() / 4.0
    }

    pub fn center_y(&self) -> f32 {
        self.bbox.iter().map(|p| p[1]).sum::<f32>() / 4.0
    }
}

/// Accepted shapes of a single entry in an OCR result document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawItem {
    /// `{"text": "...", "box": [[x, y], ...], "score": 0.98}`
    Object {
        text: String,
        #[serde(rename = "box", alias = "bbox")]
        bbox: Vec<Point>,
        #[serde(default)]
        score: Option<f32>,
    },
    /// PaddleOCR's `[[[x, y], ...], ["text", score]]`
    Paddle((Vec<Point>, (String, f32))),
}

impl RawItem {
    fn into_item(self, index: usize) -> std::result::Result<InputItem, InputError> {
        let (text, points, score) = match self {
            RawItem::Object { text, bbox, score } => (text, bbox, score),
            RawItem::Paddle((bbox, (text, score))) => (text, bbox, Some(score)),
        };

        let bbox: [Point; 4] = points.try_into().map_err(|points: Vec<Point>| {
            InputError::MalformedItem {
                index,
                reason: format!("expected 4 box points, got {}", points.len()),
            }
        })?;

        if bbox.iter().flatten().any(|v| !v.is_finite()) {
            return Err(InputError::MalformedItem {
                index,
                reason: "box coordinates must be finite".to_string(),
            });
        }

        Ok(InputItem { text, bbox, score })
    }
}

/// Parse an OCR result document into input items.
///
/// Accepts a flat list of entries or PaddleOCR's per-page list of entries
/// (pages that are `null` hold no text and are skipped).
pub fn load_items(json: &str) -> Result<Vec<InputItem>> {
    if json.trim().is_empty() {
        return Err(InputError::Empty.into());
    }

    let document: Value = serde_json::from_str(json)?;
    let Value::Array(entries) = document else {
        return Err(InputError::Unsupported("top-level value must be an array".to_string()).into());
    };

    let entries = if is_page_list(&entries) {
        debug!("OCR document is a list of {} pages", entries.len());
        entries
            .into_iter()
            .filter_map(|page| match page {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .flatten()
            .collect()
    } else {
        entries
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let raw: RawItem =
                serde_json::from_value(value).map_err(|e| InputError::MalformedItem {
                    index,
                    reason: e.to_string(),
                })?;
            Ok(raw.into_item(index)?)
        })
        .collect()
}

/// A page list nests one level deeper than an item list: page → entry → box → point.
fn is_page_list(entries: &[Value]) -> bool {
    entries.iter().any(|page| {
        page.get(0)
            .and_then(|entry| entry.get(0))
            .and_then(|bbox| bbox.get(0))
            .is_some_and(Value::is_array)
    }) || (!entries.is_empty() && entries.iter().all(Value::is_null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        let item = InputItem::from_rect("Q235B", 10.0, 20.0, 50.0, 40.0);
        assert_eq!(item.center(), (30.0, 30.0));
    }

    #[test]
    fn test_load_object_items() {
        let json = r#"[
            {"text": "B234567890C", "box": [[0,0],[100,0],[100,20],[0,20]], "score": 0.99},
            {"text": "1234567890", "bbox": [[300,0],[400,0],[400,20],[300,20]]}
        ]"#;
        let items = load_items(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].score, Some(0.99));
        assert_eq!(items[1].text, "1234567890");
        assert_eq!(items[1].center_x(), 350.0);
    }

    #[test]
    fn test_load_paddle_pages() {
        let json = r#"[[
            [[[0,0],[100,0],[100,20],[0,20]], ["B234567890C", 0.98]],
            [[[300,0],[400,0],[400,20],[300,20]], ["1234567890", 0.95]]
        ]]"#;
        let items = load_items(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "B234567890C");
        assert_eq!(items[1].score, Some(0.95));
    }

    #[test]
    fn test_load_paddle_flat() {
        let json = r#"[[[[0,0],[100,0],[100,20],[0,20]], ["Q235B", 0.9]]]"#;
        let items = load_items(json).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "Q235B");
    }

    #[test]
    fn test_load_empty_page() {
        assert!(load_items("[null]").unwrap().is_empty());
        assert!(load_items("[]").unwrap().is_empty());
    }

    #[test]
    fn test_load_rejects_three_point_box() {
        let json = r#"[{"text": "x", "box": [[0,0],[1,0],[1,1]]}]"#;
        let err = load_items(json).unwrap_err();
        assert!(err.to_string().contains("index 0"));
    }

    #[test]
    fn test_load_rejects_object_document() {
        assert!(load_items(r#"{"text": "x"}"#).is_err());
        assert!(load_items("   ").is_err());
    }
}
