//! Trait for 3D object detection inference backends.

use crate::detection::RawDetectionBatch;
use crate::error::PipelineError;
use crate::frame::Point;

/// Trait for point-cloud inference backends.
///
/// Implement this trait to connect a voxelization + network stack to the
/// pipeline. The engine is invoked synchronously, one frame at a time.
///
/// # Example
///
/// ```ignore
/// use pointtrack_rs::{InferenceEngine, PipelineError, Point, RawDetectionBatch};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl InferenceEngine for MyDetector {
///     fn infer(&mut self, points: &[Point]) -> Result<RawDetectionBatch, PipelineError> {
///         // Voxelize, run the network, decode boxes
///         Ok(RawDetectionBatch::default())
///     }
/// }
/// ```
pub trait InferenceEngine {
    /// Run inference on a prepared point buffer.
    ///
    /// # Arguments
    /// * `points` - `(x, y, z, intensity, timestamp)` returns; timestamps are zero
    ///
    /// # Returns
    /// One batch whose arrays share their first dimension, or
    /// [`PipelineError::InferenceUnavailable`] when the engine cannot run.
    fn infer(&mut self, points: &[Point]) -> Result<RawDetectionBatch, PipelineError>;

    /// Whether the engine has a device and a loaded model.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn infer(&mut self, points: &[Point]) -> Result<RawDetectionBatch, PipelineError> {
        (**self).infer(points)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
