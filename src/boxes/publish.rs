use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::Serialize;

use crate::frame::Stamp;

/// Meaning of a box's scalar `value` field.
///
/// Detection mode publishes confidence scores, tracking mode publishes track
/// ids. A single collection never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxValue {
    Score(f32),
    TrackId(u64),
}

impl BoxValue {
    /// The value as the single float carried on the wire.
    pub fn as_f32(&self) -> f32 {
        match *self {
            Self::Score(score) => score,
            Self::TrackId(id) => id as f32,
        }
    }

    pub fn score(&self) -> Option<f32> {
        match *self {
            Self::Score(score) => Some(score),
            Self::TrackId(_) => None,
        }
    }

    pub fn track_id(&self) -> Option<u64> {
        match *self {
            Self::TrackId(id) => Some(id),
            Self::Score(_) => None,
        }
    }
}

/// An oriented 3D box ready for publication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishBox {
    pub position: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
    /// (width, length, height)
    pub dimensions: Vector3<f32>,
    pub label: u32,
    pub value: BoxValue,
}

/// Everything published for one sensor frame.
///
/// `frame_id` and `stamp` are copied from the triggering frame. `boxes` may be
/// empty; an empty collection is still published to keep the per-frame cadence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxCollection {
    pub frame_id: String,
    pub stamp: Stamp,
    pub boxes: Vec<PublishBox>,
}

impl BoxCollection {
    pub fn new(frame_id: impl Into<String>, stamp: Stamp, boxes: Vec<PublishBox>) -> Self {
        Self {
            frame_id: frame_id.into(),
            stamp,
            boxes,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
