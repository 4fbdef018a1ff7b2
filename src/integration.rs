//! Integration layer connecting an inference engine, the tracker and a publish sink.
//!
//! The inference engine and the tracker are consumed through traits; this
//! module owns everything in between: class filtering, box re-encoding, the
//! tracking session and the per-topic frame worker.

mod bridge;
mod builder;
mod detector;
mod pipeline;
mod sink;
mod worker;

pub use bridge::TrackingBridge;
pub use builder::RawDetectionBuilder;
pub use detector::InferenceEngine;
pub use pipeline::FrameProcessor;
pub use sink::PublishSink;
pub use worker::{FrameSubmitter, FrameWorker, SubmitOutcome, WorkerStats, run_frames};
