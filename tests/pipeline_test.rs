use std::cell::Cell;
use std::fmt;
use std::io::Write;
use std::ops::ControlFlow;
use std::rc::Rc;

use detwatch::{
    DetectionModel, DetectorAdapter, DetwatchConfig, Error, Frame, FramePipeline, FrameSource,
    Prediction, PredictionBuilder, ProximityTracker, StreamSession, ZoneKind,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug)]
struct StubError(&'static str);

impl fmt::Display for StubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for StubError {}

/// Replays scripted predictions; `None` entries simulate inference failures.
struct ScriptedModel {
    ready: bool,
    fail_load: bool,
    script: Vec<Option<Vec<Prediction>>>,
}

impl ScriptedModel {
    fn new(script: Vec<Option<Vec<Prediction>>>) -> Self {
        Self {
            ready: false,
            fail_load: false,
            script,
        }
    }
}

impl DetectionModel for ScriptedModel {
    type Error = StubError;

    fn load(&mut self) -> Result<(), Self::Error> {
        if self.fail_load {
            return Err(StubError("model download failed"));
        }
        self.ready = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn predict(&mut self, _frame: &Frame) -> Result<Vec<Prediction>, Self::Error> {
        if self.script.is_empty() {
            return Ok(Vec::new());
        }
        self.script
            .remove(0)
            .ok_or(StubError("inference crashed"))
    }
}

/// Frame source that records whether it was released.
struct FakeCamera {
    deny_permission: bool,
    remaining: u64,
    next_ts: u64,
    closed: Rc<Cell<u32>>,
}

impl FakeCamera {
    fn new(frames: u64, closed: Rc<Cell<u32>>) -> Self {
        Self {
            deny_permission: false,
            remaining: frames,
            next_ts: 1,
            closed,
        }
    }
}

impl FrameSource for FakeCamera {
    type Error = StubError;

    fn open(&mut self) -> Result<(), Self::Error> {
        if self.deny_permission {
            return Err(StubError("permission denied"));
        }
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        let ts = self.next_ts;
        self.next_ts += 1;
        Ok(Some(Frame::new(vec![0; 12], 2, 2, ts)))
    }

    fn close(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

fn person(x: f32, y: f32) -> Prediction {
    PredictionBuilder::new()
        .label("person")
        .tlwh(x, y, 50.0, 100.0)
        .score(0.9)
        .build()
}

#[test]
fn test_load_failure_propagates_and_frame_failure_does_not() {
    init_logging();

    let mut broken = ScriptedModel::new(vec![]);
    broken.fail_load = true;
    let mut pipeline = FramePipeline::with_default_config(broken);
    assert!(matches!(pipeline.load(), Err(Error::ModelLoad(_))));
    assert!(matches!(
        pipeline.process_frame(&Frame::default()),
        Err(Error::ModelNotReady)
    ));

    let mut pipeline = FramePipeline::with_default_config(ScriptedModel::new(vec![
        Some(vec![person(100.0, 100.0)]),
        None,
        Some(vec![person(105.0, 100.0)]),
    ]));
    pipeline.load().unwrap();

    let first = pipeline.process_frame(&Frame::new(vec![], 0, 0, 1)).unwrap();
    let failed = pipeline.process_frame(&Frame::new(vec![], 0, 0, 2)).unwrap();
    let third = pipeline.process_frame(&Frame::new(vec![], 0, 0, 3)).unwrap();

    assert_eq!(first.detections.len(), 1);
    assert!(failed.detections.is_empty());
    // the failed frame emptied the tracker's memory
    assert_eq!(third.detections[0].track_id, Some(2));
}

#[test]
fn test_pipeline_from_config() {
    init_logging();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [adapter]
        min_score = 0.5

        [[zones]]
        name = "stage"
        kind = "restricted"
        x = 0.0
        y = 0.0
        width = 200.0
        height = 250.0
        "#
    )
    .unwrap();

    let cfg = DetwatchConfig::from_path(file.path()).unwrap();
    let low = PredictionBuilder::new()
        .label("person")
        .tlwh(400.0, 0.0, 10.0, 10.0)
        .score(0.3)
        .build();
    let model = ScriptedModel::new(vec![Some(vec![person(100.0, 100.0), low])]);
    let mut pipeline = FramePipeline::new(
        DetectorAdapter::with_config(model, cfg.adapter.clone()),
        ProximityTracker::new(cfg.tracker.clone()),
        cfg.build_monitor().unwrap(),
    );
    pipeline.load().unwrap();

    let report = pipeline.process_frame(&Frame::new(vec![], 0, 0, 42)).unwrap();
    assert_eq!(report.detections.len(), 1);
    // centre (125, 150) is inside the zone
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].zone_name, "stage");
    assert_eq!(pipeline.monitor().zones()[0].kind, ZoneKind::Restricted);
}

#[test]
fn test_detection_serializes_for_renderers() {
    let model = ScriptedModel::new(vec![Some(vec![person(100.0, 100.0)])]);
    let mut pipeline = FramePipeline::with_default_config(model);
    pipeline.load().unwrap();
    let report = pipeline.process_frame(&Frame::new(vec![], 0, 0, 5)).unwrap();

    let json = serde_json::to_value(&report.detections[0]).unwrap();
    assert_eq!(json["id"], "5_0");
    assert_eq!(json["label"], "person");
    assert_eq!(json["area"], 5000.0);
    assert_eq!(json["aspect_ratio"], 0.5);
    assert_eq!(json["track_id"], 1);
    assert_eq!(json["bbox"]["width"], 50.0);
}

#[test]
fn test_stream_runs_until_source_ends_and_releases_camera() {
    init_logging();

    let closed = Rc::new(Cell::new(0));
    let mut camera = FakeCamera::new(3, closed.clone());
    let mut pipeline = FramePipeline::with_default_config(ScriptedModel::new(vec![
        Some(vec![person(100.0, 100.0)]),
        Some(vec![person(102.0, 100.0)]),
        Some(vec![person(104.0, 100.0)]),
    ]));
    pipeline.load().unwrap();

    let mut session = StreamSession::new(&mut pipeline);
    let mut seen = Vec::new();
    let summary = session
        .run(&mut camera, |report| {
            seen.push(report.detections[0].track_id);
            ControlFlow::Continue(())
        })
        .unwrap();

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.detections, 3);
    assert_eq!(seen, vec![Some(1), Some(1), Some(1)]);
    assert_eq!(closed.get(), 1);
    assert!(!session.gate().is_active());
    assert!(session.current().is_none());
}

#[test]
fn test_stream_stops_on_break() {
    let closed = Rc::new(Cell::new(0));
    let mut camera = FakeCamera::new(100, closed.clone());
    let mut pipeline = FramePipeline::with_default_config(ScriptedModel::new(vec![]));
    pipeline.load().unwrap();

    let mut session = StreamSession::new(&mut pipeline);
    let mut frames = 0;
    let summary = session
        .run(&mut camera, |_| {
            frames += 1;
            if frames == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

    assert_eq!(summary.frames, 2);
    assert_eq!(camera.remaining, 98);
    assert_eq!(closed.get(), 1);
}

#[test]
fn test_permission_denied_surfaces_and_releases_camera() {
    let closed = Rc::new(Cell::new(0));
    let mut camera = FakeCamera::new(5, closed.clone());
    camera.deny_permission = true;
    let mut pipeline = FramePipeline::with_default_config(ScriptedModel::new(vec![]));
    pipeline.load().unwrap();

    let mut session = StreamSession::new(&mut pipeline);
    let err = session
        .run(&mut camera, |_| ControlFlow::Continue(()))
        .unwrap_err();

    assert!(matches!(err, Error::Capture(_)));
    assert!(err.to_string().contains("permission denied"));
    assert_eq!(closed.get(), 1);
}

#[test]
fn test_stream_requires_loaded_model() {
    let closed = Rc::new(Cell::new(0));
    let mut camera = FakeCamera::new(1, closed.clone());
    let mut pipeline = FramePipeline::with_default_config(ScriptedModel::new(vec![]));

    let mut session = StreamSession::new(&mut pipeline);
    let err = session
        .run(&mut camera, |_| ControlFlow::Continue(()))
        .unwrap_err();

    assert!(matches!(err, Error::ModelNotReady));
    assert_eq!(closed.get(), 0);
}

#[test]
fn test_late_result_is_discarded_after_stop() {
    let mut pipeline =
        FramePipeline::with_default_config(ScriptedModel::new(vec![Some(vec![person(0.0, 0.0)])]));
    pipeline.load().unwrap();

    let frame = Frame::new(vec![], 0, 0, 9);
    let detections = pipeline.adapter_mut().detect(&frame).unwrap();

    let mut session = StreamSession::new(&mut pipeline);
    session.start();
    let ticket = session.gate().ticket().unwrap();
    session.stop();

    assert!(session.submit(ticket, detections, 9).is_none());
    assert!(session.current().is_none());
    assert!(session.pipeline().tracker().previous().is_empty());
}
