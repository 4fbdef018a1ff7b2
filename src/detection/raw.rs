//! Detector output before any post-processing.

use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PipelineError;

/// Number of values per box in a [`RawDetectionBatch`]:
/// `[x, y, z, dx, dy, dz, vx, vy, yaw]`.
pub const BOX_DIM: usize = 9;

/// A single detection as produced by the inference engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Box center in the sensor frame
    pub center: Point3<f32>,
    /// Box extent along the detector's x, y and z axes
    pub size: Vector3<f32>,
    /// Heading in radians, detector convention
    pub yaw: f32,
    /// Ground-plane velocity (vx, vy) in m/s
    pub velocity: Vector2<f32>,
    /// Index into the class table
    pub class_id: u32,
    /// Confidence in [0, 1]
    pub score: f32,
}

impl RawDetection {
    /// Decode one row of a batch.
    pub fn from_box(values: &[f32; BOX_DIM], class_id: u32, score: f32) -> Self {
        Self {
            center: Point3::new(values[0], values[1], values[2]),
            size: Vector3::new(values[3], values[4], values[5]),
            velocity: Vector2::new(values[6], values[7]),
            yaw: values[8],
            class_id,
            score,
        }
    }

    /// Finite geometry and a score within `[0, 1]`.
    pub fn is_well_formed(&self) -> bool {
        self.center.iter().all(|v| v.is_finite())
            && self.size.iter().all(|v| v.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
            && self.yaw.is_finite()
            && (0.0..=1.0).contains(&self.score)
    }
}

/// Structure-of-arrays output of one inference call.
///
/// All three arrays must share their first dimension; [`validate`](Self::validate)
/// rejects a batch that does not rather than truncating it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetectionBatch {
    pub boxes: Vec<[f32; BOX_DIM]>,
    pub scores: Vec<f32>,
    pub labels: Vec<u32>,
}

impl RawDetectionBatch {
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let expected = self.boxes.len();
        if self.scores.len() != expected {
            return Err(PipelineError::MalformedBatch {
                field: "scores",
                expected,
                got: self.scores.len(),
            });
        }
        if self.labels.len() != expected {
            return Err(PipelineError::MalformedBatch {
                field: "labels",
                expected,
                got: self.labels.len(),
            });
        }
        Ok(())
    }

    /// Validate and split the batch into per-object detections, in batch order.
    ///
    /// Rows with non-finite geometry or a score outside `[0, 1]` (NaN included)
    /// are dropped with a warning.
    pub fn detections(&self) -> Result<Vec<RawDetection>, PipelineError> {
        self.validate()?;
        let mut detections = Vec::with_capacity(self.len());
        for (index, ((values, &score), &label)) in
            self.boxes.iter().zip(&self.scores).zip(&self.labels).enumerate()
        {
            let det = RawDetection::from_box(values, label, score);
            if det.is_well_formed() {
                detections.push(det);
            } else {
                warn!(index, class_id = label, score, "dropping ill-formed detection");
            }
        }
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_batch_decodes_box_layout() {
        let batch = RawDetectionBatch {
            boxes: vec![[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.5, -0.5, 0.25]],
            scores: vec![0.8],
            labels: vec![7],
        };

        let dets = batch.detections().unwrap();
        assert_eq!(dets.len(), 1);
        let det = &dets[0];
        assert_eq!(det.center, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(det.size, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(det.velocity, Vector2::new(0.5, -0.5));
        assert_eq!(det.yaw, 0.25);
        assert_eq!(det.class_id, 7);
        assert_eq!(det.score, 0.8);
    }

    #[test]
    fn test_mismatched_lengths_fail_fast() {
        let batch = RawDetectionBatch {
            boxes: vec![[0.0; BOX_DIM]; 3],
            scores: vec![0.9, 0.9, 0.9],
            labels: vec![0, 1],
        };

        let err = batch.detections().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedBatch);
        assert_eq!(
            err,
            PipelineError::MalformedBatch {
                field: "labels",
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_empty_batch_is_valid() {
        let batch = RawDetectionBatch::default();
        assert!(batch.is_empty());
        assert!(batch.detections().unwrap().is_empty());
    }

    #[test]
    fn test_ill_formed_rows_are_dropped() {
        let mut bad_box = [1.0; BOX_DIM];
        bad_box[8] = f32::INFINITY;
        let batch = RawDetectionBatch {
            boxes: vec![[1.0; BOX_DIM], [2.0; BOX_DIM], bad_box, [3.0; BOX_DIM]],
            scores: vec![f32::NAN, 0.7, 0.9, 1.5],
            labels: vec![0, 1, 2, 3],
        };

        let dets = batch.detections().unwrap();
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].class_id, 1);
        assert_eq!(dets[0].score, 0.7);
    }
}
