use std::collections::VecDeque;

use pointtrack_rs::{
    BoxValue, FrameProcessor, InferenceEngine, OperatingMode, PipelineConfig, PipelineError,
    Point, RawDetectionBatch, SensorFrame, Stamp,
};

/// Hands out one pre-recorded batch per frame.
struct RecordedEngine {
    batches: VecDeque<RawDetectionBatch>,
}

impl InferenceEngine for RecordedEngine {
    fn infer(&mut self, _points: &[Point]) -> Result<RawDetectionBatch, PipelineError> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

/// A single car box `[x, y, z, dx, dy, dz, vx, vy, yaw]` moving along +x.
fn car(x: f32, vx: f32, score: f32) -> RawDetectionBatch {
    RawDetectionBatch {
        boxes: vec![[x, 5.0, -0.8, 4.5, 1.9, 1.6, vx, 0.0, 0.0]],
        scores: vec![score],
        labels: vec![0],
    }
}

fn frame(secs: u32, nsecs: u32) -> SensorFrame {
    SensorFrame::new("velodyne", Stamp::new(secs, nsecs), vec![[0.0, 0.0, 0.0, 0.0, 0.0]])
}

fn track_ids(collection: &pointtrack_rs::BoxCollection) -> Vec<u64> {
    collection
        .boxes
        .iter()
        .filter_map(|b| b.value.track_id())
        .collect()
}

#[test]
fn test_basic_tracking() {
    let config = PipelineConfig {
        tracker: pointtrack_rs::TrackerConfig {
            max_age: 2,
            ..Default::default()
        },
        ..Default::default()
    };
    let engine = RecordedEngine {
        batches: VecDeque::from(vec![
            // Frame 1: one car
            car(0.0, 10.0, 0.9),
            // Frame 2: same car 1 m further after 0.1 s
            car(1.0, 10.0, 0.9),
            // Frame 3: below the tracking admission threshold, the track coasts
            car(2.0, 10.0, 0.5),
            // Frame 4: car is back
            car(3.0, 10.0, 0.9),
            // Frames 5-6: car disappears until the track ages out
            RawDetectionBatch::default(),
            RawDetectionBatch::default(),
        ]),
    };
    let mut processor = FrameProcessor::with_center_tracker(engine, &config);

    let f1 = processor.process_frame(frame(100, 0)).unwrap();
    assert_eq!(f1.len(), 1);
    let id = track_ids(&f1)[0];

    let f2 = processor.process_frame(frame(100, 100_000_000)).unwrap();
    assert_eq!(track_ids(&f2), vec![id]);

    let f3 = processor.process_frame(frame(100, 200_000_000)).unwrap();
    assert_eq!(track_ids(&f3), vec![id]);
    // coasting moved the box forward by v * dt
    assert!((f3.boxes[0].position.x - 2.0).abs() < 1e-3);

    let f4 = processor.process_frame(frame(100, 300_000_000)).unwrap();
    assert_eq!(track_ids(&f4), vec![id]);

    let f5 = processor.process_frame(frame(100, 400_000_000)).unwrap();
    assert_eq!(track_ids(&f5), vec![id]);

    // Frame 6: past max_age, but the collection is still produced
    let f6 = processor.process_frame(frame(100, 500_000_000)).unwrap();
    assert!(f6.is_empty());
    assert_eq!(f6.frame_id, "velodyne");
}

#[test]
fn test_track_boxes_keep_publish_convention() {
    let config = PipelineConfig::default();
    let engine = RecordedEngine {
        batches: VecDeque::from(vec![car(0.0, 0.0, 0.9)]),
    };
    let mut processor = FrameProcessor::with_center_tracker(engine, &config);

    let tracked = processor.process_frame(frame(1, 0)).unwrap();
    let detected = processor
        .process_frame_with_mode(frame(2, 0), OperatingMode::Detection)
        .unwrap();
    assert!(detected.is_empty()); // recording exhausted

    let tracked_box = &tracked.boxes[0];
    // (dx, dy, dz) = (4.5, 1.9, 1.6) is published as (1.9, 4.5, 1.6) in both modes
    assert_eq!(tracked_box.dimensions.x, 1.9);
    assert_eq!(tracked_box.dimensions.y, 4.5);
    assert_eq!(tracked_box.dimensions.z, 1.6);
    assert_eq!(tracked_box.label, 0);
    assert_eq!(tracked_box.value, BoxValue::TrackId(1));
    assert!((tracked_box.orientation.euler_angles().2 + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
}

#[test]
fn test_hungarian_config_tracks_two_cars() {
    let config = PipelineConfig::from_json_str(
        r#"{ "tracker": { "max_age": 3, "association": "hungarian" } }"#,
    )
    .unwrap();
    let two_cars = |offset: f32| RawDetectionBatch {
        boxes: vec![
            [offset, 0.0, 0.0, 4.5, 1.9, 1.6, 0.0, 0.0, 0.0],
            [offset + 10.0, 0.0, 0.0, 4.5, 1.9, 1.6, 0.0, 0.0, 0.0],
        ],
        scores: vec![0.9, 0.8],
        labels: vec![0, 0],
    };
    let engine = RecordedEngine {
        batches: VecDeque::from(vec![two_cars(0.0), two_cars(0.5)]),
    };
    let mut processor = FrameProcessor::with_center_tracker(engine, &config);

    let first = processor.process_frame(frame(1, 0)).unwrap();
    let second = processor.process_frame(frame(1, 100_000_000)).unwrap();

    let mut ids_first = track_ids(&first);
    let mut ids_second = track_ids(&second);
    ids_first.sort();
    ids_second.sort();
    assert_eq!(ids_first, vec![1, 2]);
    assert_eq!(ids_second, ids_first);
}
