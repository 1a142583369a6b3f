//! Wraps a model and turns its raw predictions into Detection records.

use crate::error::{Error, Result};
use crate::integration::{DetectionModel, Frame};
use crate::tracker::Detection;

/// Optional filtering applied to raw predictions before normalization.
///
/// The defaults pass every prediction through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    /// Predictions scoring below this are dropped.
    pub min_score: f32,
    /// Keep at most this many predictions, in model order.
    pub max_detections: Option<usize>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            max_detections: None,
        }
    }
}

pub struct DetectorAdapter<M: DetectionModel> {
    model: M,
    config: AdapterConfig,
}

impl<M: DetectionModel> DetectorAdapter<M> {
    /// Adapter passing every prediction through.
    pub fn new(model: M) -> Self {
        Self::with_config(model, AdapterConfig::default())
    }

    /// Adapter with custom prediction filtering.
    pub fn with_config(model: M, config: AdapterConfig) -> Self {
        Self { model, config }
    }

    /// Load the model. Failures are returned to the caller.
    pub fn load(&mut self) -> Result<()> {
        if self.model.is_ready() {
            return Ok(());
        }
        self.model
            .load()
            .map_err(|e| Error::ModelLoad(Box::new(e)))?;
        log::info!("detection model ready");
        Ok(())
    }

    /// Whether the model has finished loading.
    pub fn is_ready(&self) -> bool {
        self.model.is_ready()
    }

    /// Detect objects in one frame.
    ///
    /// Returns [`Error::ModelNotReady`] before [`load`](Self::load) succeeded.
    /// An inference failure is logged and reported as an empty frame.
    pub fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        if !self.model.is_ready() {
            return Err(Error::ModelNotReady);
        }

        let predictions = match self.model.predict(frame) {
            Ok(predictions) => predictions,
            Err(e) => {
                log::warn!("inference failed for frame {}: {e}", frame.timestamp_ms);
                return Ok(Vec::new());
            }
        };

        let limit = self.config.max_detections.unwrap_or(usize::MAX);
        Ok(predictions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.score >= self.config.min_score)
            .take(limit)
            .map(|(i, p)| Detection::from_prediction(p, i, frame.timestamp_ms))
            .collect())
    }

    /// Get a reference to the filtering settings.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Get a reference to the underlying model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the underlying model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }
}
