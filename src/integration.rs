//! Integration module for connecting detection models and frame sources.
//!
//! This module provides the model collaborator trait, the adapter that
//! normalizes its output, the per-frame pipeline and the live stream driver.

mod adapter;
mod builder;
mod detector;
mod pipeline;
mod stream;

pub use adapter::{AdapterConfig, DetectorAdapter};
pub use builder::PredictionBuilder;
pub use detector::{DetectionModel, Frame, Prediction};
pub use pipeline::{FramePipeline, FrameReport};
pub use stream::{
    CaptureGuard, FrameSource, FrameTicket, StreamGate, StreamSession, StreamSummary,
};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel, RawDetection};
