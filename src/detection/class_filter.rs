//! Class-aware confidence filtering.

use std::collections::BTreeMap;

use tracing::debug;

use super::{RawDetection, RawDetectionBatch};
use crate::error::PipelineError;

/// Keeps detections whose score reaches the threshold configured for their class.
///
/// Survivors are regrouped by ascending class id: every class-0 survivor, then
/// every class-1 survivor, and so on, keeping batch order inside a class.
/// Downstream per-class logic relies on this contiguity. Classes missing from
/// the table never appear in the output.
#[derive(Debug, Clone)]
pub struct ClassThresholdFilter {
    thresholds: BTreeMap<u32, f32>,
}

impl ClassThresholdFilter {
    pub fn new(thresholds: BTreeMap<u32, f32>) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &BTreeMap<u32, f32> {
        &self.thresholds
    }

    pub fn filter(&self, detections: &[RawDetection]) -> Vec<RawDetection> {
        let mut kept = Vec::with_capacity(detections.len());
        for (&class_id, &threshold) in &self.thresholds {
            kept.extend(
                detections
                    .iter()
                    .filter(|d| d.class_id == class_id && d.score >= threshold)
                    .cloned(),
            );
        }
        debug!(
            input = detections.len(),
            kept = kept.len(),
            "class threshold filter"
        );
        kept
    }

    /// Validate a raw batch and filter it.
    pub fn filter_batch(
        &self,
        batch: &RawDetectionBatch,
    ) -> Result<Vec<RawDetection>, PipelineError> {
        Ok(self.filter(&batch.detections()?))
    }
}
