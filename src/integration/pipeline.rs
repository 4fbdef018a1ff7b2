//! FrameProcessor for turning one point cloud into one box collection.

use std::time::Instant;

use tracing::debug;

use crate::boxes::{BoxCollection, PublishBox, detection_to_publish, track_to_publish};
use crate::config::{OperatingMode, PipelineConfig};
use crate::detection::ClassThresholdFilter;
use crate::error::PipelineError;
use crate::frame::{SensorFrame, prepare_points};
use crate::tracker::{CenterTracker, MultiObjectTracker};

use super::{InferenceEngine, TrackingBridge};

/// Runs inference, filtering and (optionally) tracking for one frame at a time.
///
/// The processor owns the tracking session, so it must not be shared between
/// sensor topics: give each topic its own processor.
pub struct FrameProcessor<E: InferenceEngine, T: MultiObjectTracker> {
    engine: E,
    filter: ClassThresholdFilter,
    bridge: TrackingBridge<T>,
    detection_threshold: f32,
    mode: OperatingMode,
}

impl<E: InferenceEngine, T: MultiObjectTracker> FrameProcessor<E, T> {
    /// Create a new processor with the given engine, tracker and config.
    pub fn new(engine: E, tracker: T, config: &PipelineConfig) -> Self {
        Self {
            engine,
            filter: ClassThresholdFilter::new(config.class_thresholds()),
            bridge: TrackingBridge::new(tracker, config.class_names(), config.tracking_threshold),
            detection_threshold: config.detection_threshold,
            mode: config.mode,
        }
    }

    /// Process a frame in the configured mode.
    pub fn process_frame(&mut self, frame: SensorFrame) -> Result<BoxCollection, PipelineError> {
        self.process_frame_with_mode(frame, self.mode)
    }

    /// Process a single frame and return the boxes to publish.
    ///
    /// In detection mode box values are scores; in tracking mode they are
    /// track ids. The returned collection may be empty and should still be
    /// published.
    ///
    /// # Errors
    /// * `InferenceUnavailable` - the engine cannot run; no further frame can succeed
    /// * `MalformedBatch`, `UnknownClass` - this frame is unusable; the tracking
    ///   session is unchanged
    pub fn process_frame_with_mode(
        &mut self,
        mut frame: SensorFrame,
        mode: OperatingMode,
    ) -> Result<BoxCollection, PipelineError> {
        if !self.engine.is_ready() {
            return Err(PipelineError::InferenceUnavailable(
                "engine reports not ready".into(),
            ));
        }

        let start = Instant::now();
        prepare_points(&mut frame.points);
        let batch = self.engine.infer(&frame.points)?;
        let infer_time = start.elapsed();

        let detections = self.filter.filter_batch(&batch)?;

        let boxes: Vec<PublishBox> = match mode {
            OperatingMode::Detection => detections
                .iter()
                .filter(|d| d.score >= self.detection_threshold)
                .map(detection_to_publish)
                .collect(),
            OperatingMode::Tracking => self
                .bridge
                .step(&detections, frame.stamp.as_secs_f64())?
                .iter()
                .map(track_to_publish)
                .collect(),
        };

        debug!(
            frame_id = %frame.frame_id,
            points = frame.points.len(),
            raw = batch.len(),
            filtered = detections.len(),
            published = boxes.len(),
            ?mode,
            infer_ms = format!("{:.2}", infer_time.as_secs_f64() * 1000.0),
            total_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0),
            "frame processed"
        );

        Ok(BoxCollection::new(frame.frame_id, frame.stamp, boxes))
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Switch the configured mode.
    ///
    /// Detection-mode frames never step the tracker, so entering tracking mode
    /// from detection mode starts a fresh tracking session: the time cursor
    /// re-initialises on the next frame and track ids restart.
    pub fn set_mode(&mut self, mode: OperatingMode) {
        if mode == OperatingMode::Tracking && self.mode != OperatingMode::Tracking {
            self.bridge.reset();
        }
        self.mode = mode;
    }

    /// Get a reference to the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get a mutable reference to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Get a reference to the tracking session.
    pub fn bridge(&self) -> &TrackingBridge<T> {
        &self.bridge
    }

    /// Get a mutable reference to the tracking session.
    pub fn bridge_mut(&mut self) -> &mut TrackingBridge<T> {
        &mut self.bridge
    }
}

impl<E: InferenceEngine> FrameProcessor<E, CenterTracker> {
    /// Create a processor backed by the reference center-distance tracker.
    pub fn with_center_tracker(engine: E, config: &PipelineConfig) -> Self {
        let tracker = CenterTracker::new(config.tracker.clone(), config.tracker_gates());
        Self::new(engine, tracker, config)
    }
}
