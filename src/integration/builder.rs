//! Builder for creating RawDetection objects from loose values.

use nalgebra::{Point3, Vector2, Vector3};

use crate::detection::RawDetection;

/// Builder for creating `RawDetection` objects field by field.
#[derive(Debug, Clone, Default)]
pub struct RawDetectionBuilder {
    center: [f32; 3],
    size: [f32; 3],
    yaw: f32,
    velocity: [f32; 2],
    class_id: u32,
    score: f32,
}

impl RawDetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the box center (x, y, z).
    pub fn center(mut self, x: f32, y: f32, z: f32) -> Self {
        self.center = [x, y, z];
        self
    }

    /// Set the box extent (dx, dy, dz) in the detector's axis order.
    pub fn size(mut self, dx: f32, dy: f32, dz: f32) -> Self {
        self.size = [dx, dy, dz];
        self
    }

    /// Set the heading in radians, detector convention.
    pub fn yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Set the ground-plane velocity (vx, vy).
    pub fn velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = [vx, vy];
        self
    }

    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Build the final `RawDetection`.
    pub fn build(self) -> RawDetection {
        RawDetection {
            center: Point3::from(self.center),
            size: Vector3::from(self.size),
            yaw: self.yaw,
            velocity: Vector2::from(self.velocity),
            class_id: self.class_id,
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_builder() {
        let det = RawDetectionBuilder::new()
            .center(10.0, 20.0, -1.0)
            .size(4.5, 1.9, 1.6)
            .velocity(3.0, 0.0)
            .class_id(0)
            .score(0.95)
            .build();

        assert_eq!(det.score, 0.95);
        assert_eq!(det.center.y, 20.0);
        assert_eq!(det.size.x, 4.5);
        assert_eq!(det.velocity.x, 3.0);
    }
}
