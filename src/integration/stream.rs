//! Live stream mode: capture lifecycle and frame pacing.

use std::ops::ControlFlow;

use crate::error::{Error, Result};
use crate::integration::{DetectionModel, Frame, FramePipeline, FrameReport};
use crate::tracker::Detection;

/// A camera or video producing frames on demand.
pub trait FrameSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Acquire the device. May fail on permission denial.
    fn open(&mut self) -> std::result::Result<(), Self::Error>;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> std::result::Result<Option<Frame>, Self::Error>;

    /// Release the device. Must be safe to call after a partial `open`.
    fn close(&mut self);
}

/// Holds a source open for its own lifetime and closes it on drop.
pub struct CaptureGuard<'a, S: FrameSource> {
    source: &'a mut S,
}

impl<'a, S: FrameSource> CaptureGuard<'a, S> {
    /// Open `source`. If opening fails the source is closed before returning.
    pub fn open(source: &'a mut S) -> Result<Self> {
        let mut guard = Self { source };
        guard.source.open().map_err(|e| Error::Capture(Box::new(e)))?;
        log::info!("capture opened");
        Ok(guard)
    }

    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.source
            .next_frame()
            .map_err(|e| Error::Capture(Box::new(e)))
    }
}

impl<S: FrameSource> Drop for CaptureGuard<'_, S> {
    fn drop(&mut self) {
        self.source.close();
        log::info!("capture closed");
    }
}

/// Proof that a frame was dispatched while a given stream was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

/// Decides whether a finished inference still belongs to the live stream.
///
/// Every start and stop opens a new generation, so a ticket taken before a
/// stop is never accepted afterwards.
#[derive(Debug, Clone, Default)]
pub struct StreamGate {
    generation: u64,
    active: bool,
}

impl StreamGate {
    pub fn start(&mut self) {
        self.generation += 1;
        self.active = true;
    }

    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.generation += 1;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ticket for the next frame, `None` when stopped.
    pub fn ticket(&self) -> Option<FrameTicket> {
        self.active.then_some(FrameTicket {
            generation: self.generation,
        })
    }

    pub fn accepts(&self, ticket: FrameTicket) -> bool {
        self.active && ticket.generation == self.generation
    }
}

/// Totals for one stream run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub frames: u64,
    pub detections: u64,
    pub alerts: u64,
}

/// Drives a [`FramePipeline`] from a [`FrameSource`], one frame at a time.
pub struct StreamSession<'p, M: DetectionModel> {
    pipeline: &'p mut FramePipeline<M>,
    gate: StreamGate,
    current: Option<FrameReport>,
}

impl<'p, M: DetectionModel> StreamSession<'p, M> {
    pub fn new(pipeline: &'p mut FramePipeline<M>) -> Self {
        Self {
            pipeline,
            gate: StreamGate::default(),
            current: None,
        }
    }

    pub fn pipeline(&self) -> &FramePipeline<M> {
        &*self.pipeline
    }

    pub fn gate(&self) -> &StreamGate {
        &self.gate
    }

    /// The report currently on display.
    pub fn current(&self) -> Option<&FrameReport> {
        self.current.as_ref()
    }

    pub fn start(&mut self) {
        self.gate.start();
        log::info!("stream started");
    }

    /// Halt scheduling and clear the displayed detections.
    pub fn stop(&mut self) {
        if self.gate.is_active() {
            log::info!("stream stopped");
        }
        self.gate.stop();
        self.current = None;
    }

    /// Hand in detections for a dispatched frame.
    ///
    /// Results whose ticket predates a stop are discarded and `None` is
    /// returned.
    pub fn submit(
        &mut self,
        ticket: FrameTicket,
        detections: Vec<Detection>,
        timestamp_ms: u64,
    ) -> Option<&FrameReport> {
        if !self.gate.accepts(ticket) {
            log::debug!("discarding stale result for frame {timestamp_ms}");
            return None;
        }
        let report = self.pipeline.apply(detections, timestamp_ms);
        self.current = Some(report);
        self.current.as_ref()
    }

    /// Pull frames from `source` until it runs dry or `on_frame` breaks.
    ///
    /// The model must already be loaded. The source is closed and the stream
    /// stopped on every exit path.
    pub fn run<S, F>(&mut self, source: &mut S, on_frame: F) -> Result<StreamSummary>
    where
        S: FrameSource,
        F: FnMut(&FrameReport) -> ControlFlow<()>,
    {
        if !self.pipeline.adapter().is_ready() {
            return Err(Error::ModelNotReady);
        }

        let result = CaptureGuard::open(source).and_then(|mut guard| {
            self.start();
            self.pump(&mut guard, on_frame)
        });
        self.stop();
        result
    }

    fn pump<S, F>(
        &mut self,
        guard: &mut CaptureGuard<'_, S>,
        mut on_frame: F,
    ) -> Result<StreamSummary>
    where
        S: FrameSource,
        F: FnMut(&FrameReport) -> ControlFlow<()>,
    {
        let mut summary = StreamSummary::default();

        while let Some(ticket) = self.gate.ticket() {
            let Some(frame) = guard.next_frame()? else {
                break;
            };
            let detections = self.pipeline.adapter_mut().detect(&frame)?;

            let Some(report) = self.submit(ticket, detections, frame.timestamp_ms) else {
                continue;
            };
            summary.frames += 1;
            summary.detections += report.detections.len() as u64;
            summary.alerts += report.alerts.len() as u64;

            if on_frame(report).is_break() {
                break;
            }
        }

        Ok(summary)
    }
}
