//! Job controller: single-flight admission, background execution and
//! owner-side completion.
//!
//! # Job lifecycle
//!
//! ```text
//! owner:      submit() ──admission──▶ JobHandle           complete(delivery)
//!                 │                                         ▲   │ stop progress
//!                 ▼ tokio::spawn                            │   │ reopen admission
//! background: executor.run(job) ──▶ ResultDispatcher ──mpsc─┘   └ play / report
//! ```
//!
//! The admission permit rides along with the job and comes back inside the
//! [`Delivery`].  It is only dropped in [`JobController::complete`], so a new
//! job cannot be admitted before the owner has handled the previous outcome.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::acquire::{select_file, Acquisition, CameraCapture, SourceError};
use crate::call::CallContext;
use crate::playback::PlaybackInvoker;

use super::admission::Admission;
use super::dispatch::{
    Delivery, JobOutcome, OutcomeReceiver, ResultDispatcher, OUTCOME_CHANNEL_CAPACITY,
};
use super::error::JobError;
use super::progress::{NoProgress, ProgressIndicator};
use super::runner::PipelineExecutor;
use super::state::{Job, Stage};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Returned to the caller when a job is accepted.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: Uuid,
    pub image: PathBuf,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// A job is already in a non-terminal stage.
    #[error("busy: another image is still being processed")]
    Busy,

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// The single message shown to the user for one job.
#[derive(Debug, Clone)]
pub enum Notice {
    Success {
        audio: PathBuf,
        /// Non-fatal problems, e.g. playback could not be started.
        warnings: Vec<String>,
    },
    Failure {
        stage: Stage,
        message: String,
        warnings: Vec<String>,
    },
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success { .. })
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Notice::Success { warnings, .. } | Notice::Failure { warnings, .. } => warnings,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success { audio, .. } => write!(f, "Audio ready: {}", audio.display())?,
            Notice::Failure { message, .. } => write!(f, "Error: {message}")?,
        }
        let warnings = self.warnings();
        if !warnings.is_empty() {
            write!(f, " (warning: {})", warnings.join("; "))?;
        }
        Ok(())
    }
}

/// What [`JobController::complete`] hands back to the owner.
#[derive(Debug)]
pub struct Completion {
    pub job: Job,
    pub notice: Notice,
}

// ---------------------------------------------------------------------------
// JobController
// ---------------------------------------------------------------------------

pub struct JobController {
    executor: Arc<PipelineExecutor>,
    playback: Arc<dyn PlaybackInvoker>,
    progress: Arc<dyn ProgressIndicator>,
    admission: Admission,
    outcomes: mpsc::Sender<Delivery>,
}

impl JobController {
    /// Create a controller and the receiver the owner context drains.
    pub fn new(
        executor: PipelineExecutor,
        playback: Arc<dyn PlaybackInvoker>,
    ) -> (Self, OutcomeReceiver) {
        let (tx, rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        let controller = Self {
            executor: Arc::new(executor),
            playback,
            progress: Arc::new(NoProgress),
            admission: Admission::new(),
            outcomes: tx,
        };
        (controller, OutcomeReceiver::new(rx))
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressIndicator>) -> Self {
        self.progress = progress;
        self
    }

    /// `true` while a job is running or its outcome has not been completed.
    pub fn is_busy(&self) -> bool {
        self.admission.is_busy()
    }

    /// Accept `image` for processing, or fail with [`SubmitError::Busy`].
    ///
    /// Returns as soon as the background task is spawned.  Must be called
    /// from within a tokio runtime.
    pub fn submit(
        &self,
        image: PathBuf,
        voice: Option<String>,
    ) -> Result<JobHandle, SubmitError> {
        let Some(permit) = self.admission.try_acquire() else {
            log::warn!("controller: rejected {} (busy)", image.display());
            return Err(SubmitError::Busy);
        };

        let job = Job::new(image, voice);
        let handle = JobHandle {
            id: job.id,
            image: job.image.clone(),
            created_at: job.created_at,
        };
        log::info!(
            "controller: accepted job {} for {}",
            handle.id,
            handle.image.display()
        );

        self.progress.start(&handle);
        let dispatcher = ResultDispatcher::new(self.outcomes.clone(), permit);
        tokio::spawn(run_job(Arc::clone(&self.executor), job, dispatcher));

        Ok(handle)
    }

    /// Submit a user-selected file.  `Ok(None)` when the selection was
    /// dismissed.
    pub fn submit_file(
        &self,
        path: &Path,
        voice: Option<String>,
    ) -> Result<Option<JobHandle>, SubmitError> {
        match select_file(path)? {
            Acquisition::Image(image) => self.submit(image, voice).map(Some),
            Acquisition::Cancelled => Ok(None),
        }
    }

    /// Take a camera snapshot and submit it.  `Ok(None)` when the capture
    /// was cancelled before a frame existed.
    pub async fn submit_capture(
        &self,
        camera: &CameraCapture,
        voice: Option<String>,
    ) -> Result<Option<JobHandle>, SubmitError> {
        // Don't bother the camera if the result would be rejected anyway.
        if self.is_busy() {
            return Err(SubmitError::Busy);
        }
        match camera.capture(&CallContext::detached()).await? {
            Acquisition::Image(image) => self.submit(image, voice).map(Some),
            Acquisition::Cancelled => {
                log::info!("controller: capture cancelled, nothing submitted");
                Ok(None)
            }
        }
    }

    /// Finish a job on the owner context: stop progress, reopen admission,
    /// then start playback or report the failure.
    pub fn complete(&self, delivery: Delivery) -> Completion {
        let (outcome, permit) = delivery.into_parts();
        let JobOutcome { mut job, result } = outcome;

        self.progress.stop();
        permit.release();

        let mut warnings = job.warnings().to_vec();
        let notice = match result {
            Ok(audio) => {
                match self.playback.play(&audio) {
                    Ok(()) => {
                        if let Err(e) = job.advance(Stage::PlaybackStarted) {
                            log::warn!("controller: job {}: {e}", job.id);
                        }
                    }
                    Err(e) => {
                        log::warn!("controller: job {} playback failed: {e}", job.id);
                        warnings.push(format!("could not start playback: {e}"));
                    }
                }
                Notice::Success { audio, warnings }
            }
            Err(err) => Notice::Failure {
                stage: job.failure().map_or(job.stage(), |f| f.stage),
                message: err.to_string(),
                warnings,
            },
        };

        log::info!("controller: job {} finished as {}", job.id, job.stage());
        Completion { job, notice }
    }
}

/// Background half of a job.  The executor runs in its own task so a
/// panicking stage still produces exactly one outcome, attributed to the
/// stage it was attempting.
async fn run_job(executor: Arc<PipelineExecutor>, job: Job, dispatcher: ResultDispatcher) {
    let snapshot = job.clone();
    let (attempting_tx, attempting) = watch::channel(Stage::Acquired);

    let task = tokio::spawn(async move {
        let mut job = job;
        let result = executor.run_watched(&mut job, &attempting_tx).await;
        JobOutcome { job, result }
    });

    let outcome = match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            let reason = if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                "job task was cancelled".to_string()
            };
            let stage = *attempting.borrow();
            log::error!(
                "controller: job {} aborted while attempting {stage}: {reason}",
                snapshot.id
            );

            let mut job = snapshot;
            job.catch_up(stage);
            let err = JobError::Internal(reason);
            job.fail(stage, err.clone());
            JobOutcome {
                job,
                result: Err(err),
            }
        }
    };

    dispatcher.dispatch(outcome).await;
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "background task panicked".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
