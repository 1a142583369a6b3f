//! Builder for creating Prediction objects from various box formats.

use crate::integration::Prediction;
use crate::tracker::Rect;

/// Builder for creating `Prediction` objects from various box formats.
#[derive(Debug, Clone, Default)]
pub struct PredictionBuilder {
    label: String,
    bbox: Rect,
    score: f32,
}

impl PredictionBuilder {
    /// Create a new prediction builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_center(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(x, y, w, h);
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Build the final `Prediction`.
    pub fn build(self) -> Prediction {
        Prediction::new(self.label, self.score, self.bbox)
    }
}
