//! Tracker-facing input and output records.

use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};
use serde::Serialize;

use crate::tracker::track_state::TrackState;

/// A detection in the form the tracker consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInputDetection {
    pub translation: Point3<f32>,
    /// Heading already mapped to the publish convention
    pub rotation: UnitQuaternion<f32>,
    /// (width, length, height)
    pub size: Vector3<f32>,
    pub velocity: Vector2<f32>,
    pub detection_name: String,
    pub detection_score: f32,
}

/// An identity-persistent object estimate reported by a tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub translation: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    /// (width, length, height), already in the publish convention
    pub size: Vector3<f32>,
    pub velocity: Vector2<f32>,
    /// Unique within one tracker session
    pub tracking_id: u64,
    /// Class id of the object
    pub label_preds: u32,
    pub detection_score: f32,
    /// Steps since the track was last matched, 1 when matched this step
    pub age: u32,
    /// Consecutive matched steps, 0 while coasting
    pub active: u32,
    pub state: TrackState,
}
