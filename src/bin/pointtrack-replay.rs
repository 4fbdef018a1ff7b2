use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pointtrack_rs::{
    AssociationMethod, FrameProcessor, InferenceEngine, OperatingMode, PipelineConfig,
    PipelineError, Point, RawDetectionBatch, SensorFrame, Stamp,
};

/// Replay recorded detector output through the post-processing pipeline and
/// print one JSON box collection per frame.
#[derive(Parser)]
#[command(name = "pointtrack-replay", version, about, long_about = None)]
struct Cli {
    /// JSON-lines recording, one frame per line
    recording: PathBuf,

    /// Pipeline config (JSON); nuScenes defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the operating mode
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Override the tracker's max_age
    #[arg(long)]
    max_age: Option<u32>,

    /// Use optimal assignment instead of greedy matching
    #[arg(long)]
    hungarian: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Tracking,
    Detection,
}

impl From<Mode> for OperatingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Tracking => OperatingMode::Tracking,
            Mode::Detection => OperatingMode::Detection,
        }
    }
}

#[derive(Deserialize)]
struct RecordedFrame {
    frame_id: String,
    stamp: Stamp,
    #[serde(default)]
    points: Vec<Point>,
    detections: RawDetectionBatch,
}

/// Inference stand-in that returns the batch recorded for the current frame.
#[derive(Default)]
struct RecordedInference {
    next: Option<RawDetectionBatch>,
}

impl InferenceEngine for RecordedInference {
    fn infer(&mut self, _points: &[Point]) -> Result<RawDetectionBatch, PipelineError> {
        self.next
            .take()
            .ok_or_else(|| PipelineError::InferenceUnavailable("no recorded batch queued".into()))
    }
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(max_age) = cli.max_age {
        config.tracker.max_age = max_age;
    }
    if cli.hungarian {
        config.tracker.association = AssociationMethod::Hungarian;
    }
    config.validate().context("validating config overrides")?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(
        mode = ?config.mode,
        max_age = config.tracker.max_age,
        association = ?config.tracker.association,
        "starting replay"
    );

    let recording = File::open(&cli.recording)
        .with_context(|| format!("opening recording {}", cli.recording.display()))?;
    let mut processor = FrameProcessor::with_center_tracker(RecordedInference::default(), &config);
    let mut out = BufWriter::new(std::io::stdout().lock());

    let mut published = 0usize;
    let mut skipped = 0usize;
    for (line_no, line) in BufReader::new(recording).lines().enumerate() {
        let line = line.context("reading recording")?;
        if line.trim().is_empty() {
            continue;
        }
        let recorded: RecordedFrame = serde_json::from_str(&line)
            .with_context(|| format!("parsing recording line {}", line_no + 1))?;

        processor.engine_mut().next = Some(recorded.detections);
        let frame = SensorFrame::new(recorded.frame_id, recorded.stamp, recorded.points);
        match processor.process_frame(frame) {
            Ok(collection) => {
                serde_json::to_writer(&mut out, &collection)?;
                writeln!(out)?;
                published += 1;
            }
            Err(e) if e.is_process_fatal() => return Err(e).context("inference stopped"),
            Err(e) => {
                warn!(line = line_no + 1, "skipping frame: {e}");
                skipped += 1;
            }
        }
    }
    out.flush()?;

    info!(published, skipped, "replay finished");
    Ok(())
}
