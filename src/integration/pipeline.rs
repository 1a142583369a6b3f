//! FramePipeline for combining detection, tracking and zone checks.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::integration::{DetectionModel, DetectorAdapter, Frame};
use crate::roi::{Alert, RoiMonitor, ZoneOccupancy};
use crate::tracker::{Detection, ProximityTracker};

/// Everything produced for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub timestamp_ms: u64,
    /// Detections carrying their track ids
    pub detections: Vec<Detection>,
    /// Alerts raised by this frame only
    pub alerts: Vec<Alert>,
    pub occupancy: Vec<ZoneOccupancy>,
    /// Number of detections per label
    pub label_counts: BTreeMap<String, usize>,
}

/// Runs detect, track and ROI check for one frame at a time.
pub struct FramePipeline<M: DetectionModel> {
    adapter: DetectorAdapter<M>,
    tracker: ProximityTracker,
    monitor: RoiMonitor,
}

impl<M: DetectionModel> FramePipeline<M> {
    pub fn new(
        adapter: DetectorAdapter<M>,
        tracker: ProximityTracker,
        monitor: RoiMonitor,
    ) -> Self {
        Self {
            adapter,
            tracker,
            monitor,
        }
    }

    /// Pipeline with default tracker settings and no zones.
    pub fn with_default_config(model: M) -> Self {
        Self::new(
            DetectorAdapter::new(model),
            ProximityTracker::default(),
            RoiMonitor::new(),
        )
    }

    /// Load the underlying model.
    pub fn load(&mut self) -> Result<()> {
        self.adapter.load()
    }

    /// Process a single frame.
    ///
    /// Only [`Error::ModelNotReady`](crate::Error::ModelNotReady) escapes;
    /// inference failures produce a report with no detections.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameReport> {
        let detections = self.adapter.detect(frame)?;
        Ok(self.apply(detections, frame.timestamp_ms))
    }

    /// Track and check detections produced elsewhere.
    pub fn apply(&mut self, mut detections: Vec<Detection>, timestamp_ms: u64) -> FrameReport {
        self.tracker.update(&mut detections);
        let alerts = self.monitor.check(&detections, timestamp_ms);
        let occupancy = self.monitor.occupancy(&detections);

        let mut label_counts = BTreeMap::new();
        for det in &detections {
            *label_counts.entry(det.label.clone()).or_insert(0) += 1;
        }

        log::debug!(
            "frame {timestamp_ms}: {} detections, {} alerts",
            detections.len(),
            alerts.len()
        );

        FrameReport {
            timestamp_ms,
            detections,
            alerts,
            occupancy,
            label_counts,
        }
    }

    /// Get a reference to the underlying adapter.
    pub fn adapter(&self) -> &DetectorAdapter<M> {
        &self.adapter
    }

    /// Get a mutable reference to the underlying adapter.
    pub fn adapter_mut(&mut self) -> &mut DetectorAdapter<M> {
        &mut self.adapter
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &ProximityTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut ProximityTracker {
        &mut self.tracker
    }

    /// Get a reference to the zone monitor.
    pub fn monitor(&self) -> &RoiMonitor {
        &self.monitor
    }

    /// Zone configuration surface.
    pub fn monitor_mut(&mut self) -> &mut RoiMonitor {
        &mut self.monitor
    }
}
