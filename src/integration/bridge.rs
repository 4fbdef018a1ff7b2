//! Tracking session: time cursor plus tracker handle.

use tracing::{debug, warn};

use crate::boxes::track_input_from_detection;
use crate::detection::RawDetection;
use crate::error::PipelineError;
use crate::tracker::{MultiObjectTracker, Track, TrackInputDetection};

/// Feeds filtered detections and inter-frame time lags to a tracker.
///
/// A bridge is one tracking session. It owns the tracker and the
/// `last_frame_time` cursor and must be driven by a single thread, one frame
/// at a time. The cursor is set lazily from the first frame's timestamp.
pub struct TrackingBridge<T: MultiObjectTracker> {
    tracker: T,
    class_names: Vec<String>,
    admission_threshold: f32,
    last_frame_time: Option<f64>,
}

impl<T: MultiObjectTracker> TrackingBridge<T> {
    /// Start a session. Resets the tracker.
    ///
    /// # Arguments
    /// * `class_names` - Tracker class names indexed by class id
    /// * `admission_threshold` - Detections must score strictly above this to reach the tracker
    pub fn new(mut tracker: T, class_names: Vec<String>, admission_threshold: f32) -> Self {
        tracker.reset();
        Self {
            tracker,
            class_names,
            admission_threshold,
            last_frame_time: None,
        }
    }

    /// Run one tracker step for the frame taken at `frame_time` seconds.
    ///
    /// Detections are validated before the cursor moves, so a frame that fails
    /// leaves both the cursor and the tracker untouched. An empty detection
    /// list still steps the tracker.
    pub fn step(
        &mut self,
        detections: &[RawDetection],
        frame_time: f64,
    ) -> Result<Vec<Track>, PipelineError> {
        let inputs = self.admit(detections)?;
        let time_lag = self.advance(frame_time);

        debug!(
            detections = detections.len(),
            admitted = inputs.len(),
            time_lag,
            "tracking step"
        );
        Ok(self.tracker.step(&inputs, time_lag))
    }

    fn admit(&self, detections: &[RawDetection]) -> Result<Vec<TrackInputDetection>, PipelineError> {
        detections
            .iter()
            .filter(|d| d.score > self.admission_threshold)
            .map(|d| {
                let name = self.class_names.get(d.class_id as usize).ok_or(
                    PipelineError::UnknownClass {
                        class_id: d.class_id,
                        known: self.class_names.len(),
                    },
                )?;
                Ok(track_input_from_detection(d, name))
            })
            .collect()
    }

    /// Move the cursor to `frame_time` and return the elapsed time since the
    /// previous frame. The cursor never moves backwards.
    fn advance(&mut self, frame_time: f64) -> f64 {
        let Some(last) = self.last_frame_time else {
            self.last_frame_time = Some(frame_time);
            return 0.0;
        };

        if frame_time < last {
            warn!(
                frame_time,
                last_frame_time = last,
                "frame older than the previous one, using zero time lag"
            );
            return 0.0;
        }

        self.last_frame_time = Some(frame_time);
        frame_time - last
    }

    /// Timestamp of the last frame that reached the tracker.
    pub fn last_frame_time(&self) -> Option<f64> {
        self.last_frame_time
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Restart the session: clear the cursor and reset the tracker.
    pub fn reset(&mut self) {
        self.last_frame_time = None;
        self.tracker.reset();
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }
}
