//! Raw detector output and class-aware confidence filtering.

mod class_filter;
mod raw;

pub use class_filter::ClassThresholdFilter;
pub use raw::{BOX_DIM, RawDetection, RawDetectionBatch};
