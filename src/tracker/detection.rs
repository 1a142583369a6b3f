//! Normalized detection record shared by the tracker and the ROI monitor.

use nalgebra::Point2;
use serde::Serialize;

use crate::integration::Prediction;
use crate::tracker::rect::Rect;

/// One object observed in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Per-frame unique id, `"{timestamp_ms}_{index}"`.
    pub id: String,
    pub label: String,
    /// Confidence score in `[0, 1]`
    pub score: f32,
    /// Bounding box in TLWH format, rounded to whole pixels
    pub bbox: Rect,
    pub center: Point2<f32>,
    pub area: f32,
    /// Width over height, rounded to 2 decimals
    pub aspect_ratio: f32,
    /// Capture time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    /// Cross-frame identity, set by the tracker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<u64>,
}

impl Detection {
    /// Normalize a raw prediction.
    ///
    /// `index` is the prediction's position in the model output and is only
    /// used to build the per-frame id.
    pub fn from_prediction(prediction: &Prediction, index: usize, timestamp_ms: u64) -> Self {
        let bbox = prediction.bbox.rounded();
        let center = bbox.center();
        Self {
            id: format!("{timestamp_ms}_{index}"),
            label: prediction.label.clone(),
            score: prediction.score.clamp(0.0, 1.0),
            bbox,
            center: Point2::new(center.x.round(), center.y.round()),
            area: bbox.area(),
            aspect_ratio: round_to_hundredths(bbox.aspect_ratio()),
            timestamp_ms,
            track_id: None,
        }
    }

    /// Euclidean distance between the two centres.
    #[inline]
    pub fn center_distance(&self, other: &Detection) -> f32 {
        nalgebra::distance(&self.center, &other.center)
    }
}

fn round_to_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
