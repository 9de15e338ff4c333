//! Progress indication shown while a job runs.
//!
//! The controller calls [`ProgressIndicator::start`] when it accepts a job
//! and [`ProgressIndicator::stop`] from the owner context once the outcome
//! has arrived.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::controller::JobHandle;

pub trait ProgressIndicator: Send + Sync {
    fn start(&self, job: &JobHandle);
    fn stop(&self);
}

/// Shows nothing.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressIndicator for NoProgress {
    fn start(&self, _job: &JobHandle) {}
    fn stop(&self) {}
}

// ---------------------------------------------------------------------------
// SpinnerProgress
// ---------------------------------------------------------------------------

/// Terminal spinner (`indicatif`).
#[derive(Default)]
pub struct SpinnerProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressIndicator for SpinnerProgress {
    fn start(&self, job: &JobHandle) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Reading {}", job.image.display()));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(old) = slot.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn stop(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingProgress  (test-only)
// ---------------------------------------------------------------------------

/// Counts start/stop calls.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingProgress {
    pub started: std::sync::atomic::AtomicUsize,
    pub stopped: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl RecordingProgress {
    pub fn running(&self) -> bool {
        use std::sync::atomic::Ordering;
        self.started.load(Ordering::SeqCst) > self.stopped.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl ProgressIndicator for RecordingProgress {
    fn start(&self, _job: &JobHandle) {
        self.started
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stopped
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
