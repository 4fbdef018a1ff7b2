//! Sensor frames as handed to the pipeline.

use serde::{Deserialize, Serialize};

/// One LiDAR return: `(x, y, z, intensity, timestamp)`.
pub type Point = [f32; 5];

/// Index of the per-point timestamp column.
pub const TIMESTAMP_COLUMN: usize = 4;

/// Header timestamp, split like a ROS time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Stamp {
    pub secs: u32,
    pub nsecs: u32,
}

impl Stamp {
    pub fn new(secs: u32, nsecs: u32) -> Self {
        Self { secs, nsecs }
    }

    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.secs as f64 + self.nsecs as f64 * 1e-9
    }
}

/// A timestamped point cloud.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    pub frame_id: String,
    pub stamp: Stamp,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl SensorFrame {
    pub fn new(frame_id: impl Into<String>, stamp: Stamp, points: Vec<Point>) -> Self {
        Self {
            frame_id: frame_id.into(),
            stamp,
            points,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Drop returns with a non-finite position and zero the timestamp column.
///
/// The detector runs without sweep compensation, so per-point time offsets
/// must not reach it.
pub fn prepare_points(points: &mut Vec<Point>) {
    points.retain(|p| p[..3].iter().all(|v| v.is_finite()));
    for p in points.iter_mut() {
        p[TIMESTAMP_COLUMN] = 0.0;
    }
}
