//! Error types for the detection post-processing pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Per-field arrays of an inference batch disagree in length.
    MalformedBatch,
    /// A class id is outside the configured class table.
    UnknownClass,
    /// The inference engine cannot produce detections.
    InferenceUnavailable,
}

/// Errors raised while processing a frame.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    /// A detection batch whose field arrays do not share a first dimension.
    #[error("malformed detection batch: `{field}` has {got} entries, expected {expected}")]
    MalformedBatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    /// A class id with no entry in the class table.
    #[error("unknown class id {class_id} (table has {known} classes)")]
    UnknownClass { class_id: u32, known: usize },

    /// The inference engine is not ready (device not initialised, model not loaded).
    #[error("inference engine unavailable: {0}")]
    InferenceUnavailable(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedBatch { .. } => ErrorKind::MalformedBatch,
            Self::UnknownClass { .. } => ErrorKind::UnknownClass,
            Self::InferenceUnavailable(_) => ErrorKind::InferenceUnavailable,
        }
    }

    /// Errors that invalidate only the current frame.
    pub fn is_frame_fatal(&self) -> bool {
        !self.is_process_fatal()
    }

    /// Errors after which no further frame can be produced.
    pub fn is_process_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::InferenceUnavailable)
    }
}

/// Errors raised while loading or validating a [`PipelineConfig`](crate::PipelineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
