//! Conversions between detector, tracker and publish box conventions.
//!
//! The detector reports `(dx, dy, dz)` extents and a heading measured in its
//! own frame. The consuming stack expects the heading rotated by
//! `yaw' = -yaw - π/2` and the first two extents swapped. Tracker output is
//! produced from already-converted inputs and is copied through unchanged.

use std::f32::consts::FRAC_PI_2;

use nalgebra::{UnitQuaternion, Vector3};

use super::{BoxValue, PublishBox};
use crate::detection::RawDetection;
use crate::tracker::{Track, TrackInputDetection};

/// Map a detector heading to the publish heading.
#[inline]
pub fn publish_yaw(raw_yaw: f32) -> f32 {
    -raw_yaw - FRAC_PI_2
}

/// Rotation of `yaw` radians about the vertical axis.
#[inline]
pub fn yaw_to_quaternion(yaw: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw)
}

/// Detector `(dx, dy, dz)` to publish `(width, length, height)`.
#[inline]
fn publish_dimensions(size: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(size.y, size.x, size.z)
}

/// Encode a detection for publication in detection mode.
pub fn detection_to_publish(det: &RawDetection) -> PublishBox {
    PublishBox {
        position: det.center,
        orientation: yaw_to_quaternion(publish_yaw(det.yaw)),
        dimensions: publish_dimensions(&det.size),
        label: det.class_id,
        value: BoxValue::Score(det.score),
    }
}

/// Encode a tracker output for publication in tracking mode.
pub fn track_to_publish(track: &Track) -> PublishBox {
    PublishBox {
        position: track.translation,
        orientation: track.rotation,
        dimensions: track.size,
        label: track.label_preds,
        value: BoxValue::TrackId(track.tracking_id),
    }
}

/// Convert a detection into tracker input using the same axis conventions as
/// [`detection_to_publish`].
pub fn track_input_from_detection(det: &RawDetection, detection_name: &str) -> TrackInputDetection {
    TrackInputDetection {
        translation: det.center,
        rotation: yaw_to_quaternion(publish_yaw(det.yaw)),
        size: publish_dimensions(&det.size),
        velocity: det.velocity,
        detection_name: detection_name.to_string(),
        detection_score: det.score,
    }
}
