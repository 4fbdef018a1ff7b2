//! Tracker interface and the reference center-distance tracker.

mod center_tracker;
mod matching;
mod track;
mod track_state;

pub use center_tracker::{AssociationMethod, CenterTracker, ClassGate, TrackerConfig};
pub use track::{Track, TrackInputDetection};
pub use track_state::TrackState;

/// A multi-object tracker driven one frame at a time.
///
/// Track birth, association, aging and death belong to the implementation;
/// callers only feed detections and the time elapsed since the previous step.
pub trait MultiObjectTracker {
    /// Forget all tracks and restart id allocation.
    fn reset(&mut self);

    /// Advance by `time_lag` seconds and associate `detections`.
    ///
    /// Called once per frame, including frames without detections, so that
    /// unmatched tracks age.
    fn step(&mut self, detections: &[TrackInputDetection], time_lag: f64) -> Vec<Track>;
}

impl<T: MultiObjectTracker + ?Sized> MultiObjectTracker for Box<T> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn step(&mut self, detections: &[TrackInputDetection], time_lag: f64) -> Vec<Track> {
        (**self).step(detections, time_lag)
    }
}
