//! Per-topic worker thread with a depth-one, drop-superseded inbound queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::{error, info, warn};

use crate::error::PipelineError;
use crate::frame::SensorFrame;
use crate::tracker::MultiObjectTracker;

use super::{FrameProcessor, InferenceEngine, PublishSink};

/// Result of handing a frame to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Queued behind nothing.
    Queued,
    /// Queued after discarding a pending frame the worker had not started.
    Superseded,
    /// The worker has stopped; the frame was discarded.
    Closed,
}

/// Frame counters reported by a finished worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Frames that produced a published collection
    pub processed: u64,
    /// Frames dropped after a frame-level error
    pub skipped: u64,
}

/// Producer side of a worker's inbound queue.
///
/// Dropping the submitter shuts the worker down once it finishes the frame in
/// hand.
pub struct FrameSubmitter {
    tx: Sender<SensorFrame>,
    evict: Receiver<SensorFrame>,
    closed: Arc<AtomicBool>,
    superseded: u64,
}

impl FrameSubmitter {
    /// Queue a frame, replacing any frame still waiting to be processed.
    ///
    /// Returns `Closed` once the worker has stopped, even when the channel
    /// still accepted the frame.
    pub fn submit(&mut self, frame: SensorFrame) -> SubmitOutcome {
        let mut frame = frame;
        let mut outcome = SubmitOutcome::Queued;
        loop {
            if self.closed.load(Ordering::Acquire) {
                return SubmitOutcome::Closed;
            }
            match self.tx.try_send(frame) {
                Ok(()) => {
                    if self.closed.load(Ordering::Acquire) {
                        // the worker stopped before taking it; nothing else will
                        let _ = self.evict.try_recv();
                        return SubmitOutcome::Closed;
                    }
                    return outcome;
                }
                Err(TrySendError::Full(pending)) => {
                    if let Ok(stale) = self.evict.try_recv() {
                        self.superseded += 1;
                        outcome = SubmitOutcome::Superseded;
                        warn!(frame_id = %stale.frame_id, stamp = stale.stamp.as_secs_f64(), "superseded pending frame");
                    }
                    frame = pending;
                }
                Err(TrySendError::Disconnected(_)) => return SubmitOutcome::Closed,
            }
        }
    }

    /// Frames discarded in favour of a newer one.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

/// Handle to a running worker thread.
pub struct FrameWorker {
    handle: JoinHandle<Result<WorkerStats, PipelineError>>,
}

impl FrameWorker {
    /// Move a processor and its sink onto a dedicated thread.
    pub fn spawn<E, T, S>(
        processor: FrameProcessor<E, T>,
        sink: S,
    ) -> std::io::Result<(FrameSubmitter, FrameWorker)>
    where
        E: InferenceEngine + Send + 'static,
        T: MultiObjectTracker + Send + 'static,
        S: PublishSink + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let closed = Arc::new(AtomicBool::new(false));
        let guard = CloseOnDrop(closed.clone());
        let evict = rx.clone();

        let handle = thread::Builder::new()
            .name("pointtrack-worker".into())
            .spawn(move || {
                let _guard = guard;
                run_frames(processor, &rx, sink)
            })?;

        let submitter = FrameSubmitter {
            tx,
            evict,
            closed,
            superseded: 0,
        };
        Ok((submitter, FrameWorker { handle }))
    }

    /// Wait for the worker to stop. Panics from the worker are propagated.
    pub fn join(self) -> Result<WorkerStats, PipelineError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

/// Process frames until the queue closes or a process-fatal error occurs.
///
/// Frame-level errors are logged and the frame is skipped; the next frame is
/// processed normally.
pub fn run_frames<E, T, S>(
    mut processor: FrameProcessor<E, T>,
    frames: &Receiver<SensorFrame>,
    mut sink: S,
) -> Result<WorkerStats, PipelineError>
where
    E: InferenceEngine,
    T: MultiObjectTracker,
    S: PublishSink,
{
    let mut stats = WorkerStats::default();

    for frame in frames.iter() {
        let frame_id = frame.frame_id.clone();
        let stamp = frame.stamp.as_secs_f64();
        match processor.process_frame(frame) {
            Ok(collection) => {
                sink.publish(collection);
                stats.processed += 1;
            }
            Err(e) if e.is_process_fatal() => {
                error!(%frame_id, stamp, "stopping frame worker: {e}");
                return Err(e);
            }
            Err(e) => {
                warn!(%frame_id, stamp, "skipping frame: {e}");
                stats.skipped += 1;
            }
        }
    }

    info!(
        processed = stats.processed,
        skipped = stats.skipped,
        "frame worker finished"
    );
    Ok(stats)
}

struct CloseOnDrop(Arc<AtomicBool>);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}
