//! Detection post-processing and tracking bridge for 3D LiDAR object detectors.
//!
//! A frame flows through [`FrameProcessor`]: the inference engine produces a
//! [`RawDetectionBatch`], [`ClassThresholdFilter`] applies per-class score
//! thresholds, and then either
//!
//! * detection mode applies a flat cutoff and publishes the detections with
//!   their scores, or
//! * tracking mode hands the detections to a [`TrackingBridge`], which steps a
//!   [`MultiObjectTracker`] with the time elapsed since the previous frame and
//!   publishes tracks with their ids.

pub mod boxes;
pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod integration;
pub mod tracker;

pub use boxes::{BoxCollection, BoxValue, PublishBox};
pub use config::{ClassConfig, OperatingMode, PipelineConfig};
pub use detection::{ClassThresholdFilter, RawDetection, RawDetectionBatch};
pub use error::{ConfigError, ErrorKind, PipelineError};
pub use frame::{Point, SensorFrame, Stamp};
pub use integration::{
    FrameProcessor, FrameSubmitter, FrameWorker, InferenceEngine, PublishSink,
    RawDetectionBuilder, SubmitOutcome, TrackingBridge, WorkerStats,
};
pub use tracker::{
    AssociationMethod, CenterTracker, MultiObjectTracker, Track, TrackInputDetection,
    TrackerConfig,
};
