//! Model collaborator trait and its input/output types.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::tracker::Rect;

/// One raw model output before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Confidence score in `[0, 1]`
    pub score: f32,
    /// Bounding box in TLWH format, source pixel units
    pub bbox: Rect,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f32, bbox: Rect) -> Self {
        Self {
            label: label.into(),
            score,
            bbox,
        }
    }
}

/// A single visual frame handed to the model.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Raw pixel bytes (layout depends on the model implementation)
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Capture time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ms: u64) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ms,
        }
    }

    /// Frame stamped with the current wall-clock time.
    pub fn captured_now(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self::new(data, width, height, now_ms())
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Trait for object detection models.
///
/// Implement this trait to connect any detection model to the adapter.
///
/// # Example
///
/// ```ignore
/// use detwatch::{DetectionModel, Frame, Prediction};
///
/// struct MyModel {
///     loaded: bool,
/// }
///
/// impl DetectionModel for MyModel {
///     type Error = std::io::Error;
///
///     fn load(&mut self) -> Result<(), Self::Error> {
///         self.loaded = true;
///         Ok(())
///     }
///
///     fn is_ready(&self) -> bool {
///         self.loaded
///     }
///
///     fn predict(&mut self, frame: &Frame) -> Result<Vec<Prediction>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionModel {
    /// Error type for load and inference failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Bring the model into a state where `predict` may be called.
    fn load(&mut self) -> Result<(), Self::Error>;

    fn is_ready(&self) -> bool;

    /// Run inference on one frame.
    ///
    /// Predictions are returned in model order; callers never re-sort them.
    fn predict(&mut self, frame: &Frame) -> Result<Vec<Prediction>, Self::Error>;
}
