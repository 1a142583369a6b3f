//! Per-frame object detection core.
//!
//! Raw model predictions are normalized into [`Detection`] records by the
//! [`DetectorAdapter`], given persistent ids by the [`ProximityTracker`] and
//! checked against rectangular zones by the [`RoiMonitor`]. The
//! [`FramePipeline`] chains the three steps for a single frame, and
//! [`StreamSession`] drives it from a live [`FrameSource`].

pub mod config;
pub mod error;
pub mod integration;
pub mod roi;
pub mod tracker;

pub use config::DetwatchConfig;
pub use error::{Error, Result};
pub use integration::{
    AdapterConfig, CaptureGuard, DetectionModel, DetectorAdapter, Frame, FramePipeline,
    FrameReport, FrameSource, FrameTicket, Prediction, PredictionBuilder, StreamGate,
    StreamSession, StreamSummary,
};
pub use roi::{Alert, AlertLog, RoiMonitor, RoiZone, Severity, ZoneKind, ZoneOccupancy};
pub use tracker::{Detection, MatchStrategy, ProximityTracker, Rect, TrackerConfig};
