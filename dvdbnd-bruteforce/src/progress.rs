//! Progress reporting decoupled from rendering.
//!
//! Workers report `(worker, done, total)` through a shared sink; how that
//! gets to a terminal (if at all) is a collaborator's concern, not the
//! engine's.

use parking_lot::Mutex;
use tracing::debug;

/// One progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Reporting worker index.
    pub worker: usize,
    /// Leaves enumerated so far by that worker.
    pub done: u64,
    /// Estimated leaves in that worker's partition; 0 when unknown.
    pub total: u64,
}

/// Sink for worker progress reports. Shared across worker threads.
pub trait ProgressSink: Send + Sync {
    /// Accept one report.
    fn report(&self, worker: usize, done: u64, total: u64);
}

/// Discards all reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _worker: usize, _done: u64, _total: u64) {}
}

/// Logs reports at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProgress;

impl ProgressSink for LoggingProgress {
    fn report(&self, worker: usize, done: u64, total: u64) {
        if total > 0 {
            debug!(
                "worker {}: {}/{} leaves ({:.1}%)",
                worker,
                done,
                total,
                done as f64 * 100.0 / total as f64
            );
        } else {
            debug!("worker {}: {} leaves", worker, done);
        }
    }
}

/// Keeps the latest report per worker behind a mutex, for polling UIs and
/// tests.
#[derive(Debug, Default)]
pub struct LatestProgress {
    latest: Mutex<Vec<ProgressEvent>>,
}

impl LatestProgress {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the most recent report per worker.
    pub fn snapshot(&self) -> Vec<ProgressEvent> {
        self.latest.lock().clone()
    }
}

impl ProgressSink for LatestProgress {
    fn report(&self, worker: usize, done: u64, total: u64) {
        let mut latest = self.latest.lock();
        if let Some(slot) = latest.iter_mut().find(|e| e.worker == worker) {
            slot.done = done;
            slot.total = total;
        } else {
            latest.push(ProgressEvent {
                worker,
                done,
                total,
            });
        }
    }
}
