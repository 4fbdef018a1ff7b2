use std::cell::Cell;
use std::rc::Rc;

use pointtrack_rs::{
    BoxCollection, FrameProcessor, FrameWorker, InferenceEngine, MultiObjectTracker,
    OperatingMode, PipelineConfig, PipelineError, Point, RawDetectionBatch, SensorFrame, Stamp,
    SubmitOutcome, Track, TrackInputDetection,
};

struct FixedEngine(RawDetectionBatch);

impl InferenceEngine for FixedEngine {
    fn infer(&mut self, _points: &[Point]) -> Result<RawDetectionBatch, PipelineError> {
        Ok(self.0.clone())
    }
}

/// Counts step calls through a shared handle so the test can inspect it.
struct CountingTracker {
    steps: Rc<Cell<usize>>,
}

impl MultiObjectTracker for CountingTracker {
    fn reset(&mut self) {}

    fn step(&mut self, _detections: &[TrackInputDetection], _time_lag: f64) -> Vec<Track> {
        self.steps.set(self.steps.get() + 1);
        vec![]
    }
}

fn frame() -> SensorFrame {
    SensorFrame::new("lidar_top", Stamp::new(1_700_000_000, 500), vec![])
}

#[test]
fn test_single_car_in_detection_mode() {
    let mut config = PipelineConfig::default();
    config.mode = OperatingMode::Detection;
    let engine = FixedEngine(RawDetectionBatch {
        boxes: vec![[12.0, -3.0, -1.0, 4.2, 1.8, 1.5, 0.0, 0.0, 0.3]],
        scores: vec![0.5],
        labels: vec![0],
    });
    let mut processor = FrameProcessor::with_center_tracker(engine, &config);

    let out = processor.process_frame(frame()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out.boxes[0].label, 0);
    assert_eq!(out.boxes[0].value.score(), Some(0.5));
    assert_eq!(out.frame_id, "lidar_top");
    assert_eq!(out.stamp, Stamp::new(1_700_000_000, 500));
}

#[test]
fn test_empty_tracking_frame_still_steps_tracker() {
    let config = PipelineConfig::default();
    let steps = Rc::new(Cell::new(0));
    let tracker = CountingTracker {
        steps: steps.clone(),
    };
    let mut processor =
        FrameProcessor::new(FixedEngine(RawDetectionBatch::default()), tracker, &config);

    let out = processor.process_frame(frame()).unwrap();
    assert!(out.is_empty());
    assert_eq!(steps.get(), 1);
}

#[test]
fn test_unknown_class_is_dropped_by_filter() {
    let config = PipelineConfig::default();
    let engine = FixedEngine(RawDetectionBatch {
        boxes: vec![[0.0; 9]],
        scores: vec![0.99],
        labels: vec![11],
    });
    let mut processor = FrameProcessor::with_center_tracker(engine, &config);

    // the class table closes the set of classes, so this never reaches the tracker
    let out = processor.process_frame(frame()).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_worker_publishes_empty_collections() {
    let config = PipelineConfig::default();
    let processor =
        FrameProcessor::with_center_tracker(FixedEngine(RawDetectionBatch::default()), &config);
    let (sink, published) = crossbeam_channel::unbounded::<BoxCollection>();

    let (mut submitter, worker) = FrameWorker::spawn(processor, sink).unwrap();
    let outcome = submitter.submit(frame());
    assert_ne!(outcome, SubmitOutcome::Closed);
    drop(submitter);

    let stats = worker.join().unwrap();
    assert_eq!(stats.processed, 1);
    let collection = published.recv().unwrap();
    assert!(collection.is_empty());
    assert_eq!(collection.frame_id, "lidar_top");
}
