//! Burn inference backend for object detection.
//!
//! This module provides a `BurnDetector` that implements `DetectionModel`
//! for running object detection models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use detwatch::integration::{BurnDetector, BurnModel, RawDetection};
//! use burn::backend::NdArray;
//!
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> Vec<RawDetection> {
//!         // Run inference
//!     }
//! }
//!
//! let detector = BurnDetector::new(MyYoloModel::load("model.bin"), device, coco_labels());
//! let mut adapter = DetectorAdapter::new(detector);
//! adapter.load()?;
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use thiserror::Error;

use super::{DetectionModel, Frame, Prediction, PredictionBuilder};

/// Label used when a class id has no entry in the label table.
const UNKNOWN_LABEL: &str = "unknown";

/// Error type for Burn detection failures.
#[derive(Debug, Clone, Error)]
pub enum BurnDetectorError {
    /// Input image has invalid dimensions.
    #[error("invalid input dimensions: expected {expected:?}, got {got:?}")]
    InvalidInputDimensions {
        expected: (u32, u32, u32),
        got: (u32, u32, u32),
    },
    #[error("preprocessing error: {0}")]
    PreprocessingError(String),
    #[error("model is not loaded: {0}")]
    NotLoaded(String),
}

/// Raw detection output from the model.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box: [x1, y1, x2, y2] or [cx, cy, w, h] depending on model
    pub bbox: [f32; 4],
    /// Confidence score
    pub score: f32,
    /// Class ID, indexes the detector's label table
    pub class_id: Option<usize>,
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on an input tensor of shape [batch, channels, height, width].
    fn forward(&self, input: Tensor<B, 4>) -> Vec<RawDetection>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 640, 640) // Default YOLO input size
    }

    /// Whether bbox output is in XYWH format (vs TLBR).
    fn bbox_is_xywh(&self) -> bool {
        true // Most YOLO variants use XYWH
    }
}

/// Burn-based object detector implementing `DetectionModel`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    labels: Vec<String>,
    ready: bool,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model, device and label table.
    pub fn new(model: M, device: B::Device, labels: Vec<String>) -> Self {
        Self {
            model,
            device,
            labels,
            ready: false,
        }
    }

    /// Convert raw frame bytes (CHW, u8) to a normalized Burn tensor.
    pub fn preprocess(
        &self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        let expected_len = (width * height * channels) as usize;

        if input.len() != expected_len {
            return Err(BurnDetectorError::InvalidInputDimensions {
                expected: (channels, height, width),
                got: (channels, height, input.len() as u32 / (height * channels).max(1)),
            });
        }

        if height != target_h || width != target_w {
            return Err(BurnDetectorError::PreprocessingError(format!(
                "input size {}x{} doesn't match model size {}x{}",
                width, height, target_w, target_h
            )));
        }

        let data: Vec<f32> = input.iter().map(|&x| x as f32 / 255.0).collect();

        Ok(
            Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
                1,
                channels as usize,
                height as usize,
                width as usize,
            ]),
        )
    }

    fn label_for(&self, class_id: Option<usize>) -> &str {
        class_id
            .and_then(|id| self.labels.get(id))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Convert raw model outputs to predictions, preserving model order.
    fn postprocess(&self, raw_detections: Vec<RawDetection>) -> Vec<Prediction> {
        raw_detections
            .into_iter()
            .map(|d| {
                let builder = PredictionBuilder::new()
                    .label(self.label_for(d.class_id))
                    .score(d.score);
                if self.model.bbox_is_xywh() {
                    builder
                        .xywh(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                        .build()
                } else {
                    builder
                        .tlbr(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                        .build()
                }
            })
            .collect()
    }
}

impl<B: Backend, M: BurnModel<B>> DetectionModel for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    /// Warm the model up with one blank forward pass.
    fn load(&mut self) -> Result<(), Self::Error> {
        if self.labels.is_empty() {
            return Err(BurnDetectorError::NotLoaded("label table is empty".into()));
        }
        let (channels, height, width) = self.model.input_size();
        let blank = Tensor::<B, 4>::zeros(
            [1, channels as usize, height as usize, width as usize],
            &self.device,
        );
        let _ = self.model.forward(blank);
        self.ready = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn predict(&mut self, frame: &Frame) -> Result<Vec<Prediction>, Self::Error> {
        if !self.ready {
            return Err(BurnDetectorError::NotLoaded("load() was not called".into()));
        }
        let tensor = self.preprocess(&frame.data, frame.width, frame.height)?;
        let raw_detections = self.model.forward(tensor);
        Ok(self.postprocess(raw_detections))
    }
}
