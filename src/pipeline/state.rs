//! Job record and stage state machine.
//!
//! [`Stage`] drives a [`Job`] through the pipeline.  Transitions only move
//! forward; `Failed` can be entered from any non-terminal stage and records
//! the stage that was being attempted together with the cause.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::error::JobError;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Stages of one image-to-voice job.
///
/// ```text
/// Submitted ──copy──▶ Acquired ──ocr──▶ Transcribed ──fix──▶ Corrected
///           ──tts──▶ Synthesized ──open──▶ PlaybackStarted
/// any non-terminal ──error──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Accepted by the controller, nothing done yet.
    Submitted,
    /// Input copied into a temp artifact.
    Acquired,
    /// Recognizer returned text.
    Transcribed,
    /// Text normalized / corrected.
    Corrected,
    /// Audio file written and verified.
    Synthesized,
    /// Audio handed to the host's player.
    PlaybackStarted,
    Failed,
}

impl Stage {
    /// The working stages a job passes through, in order.
    pub const PIPELINE: [Stage; 4] = [
        Stage::Acquired,
        Stage::Transcribed,
        Stage::Corrected,
        Stage::Synthesized,
    ];

    fn rank(self) -> u8 {
        match self {
            Stage::Submitted => 0,
            Stage::Acquired => 1,
            Stage::Transcribed => 2,
            Stage::Corrected => 3,
            Stage::Synthesized => 4,
            Stage::PlaybackStarted => 5,
            Stage::Failed => 6,
        }
    }

    /// `true` once the job no longer occupies the pipeline.
    ///
    /// ```
    /// use ocr_to_voice::pipeline::Stage;
    ///
    /// assert!(!Stage::Corrected.is_terminal());
    /// assert!(Stage::Synthesized.is_terminal());
    /// assert!(Stage::Failed.is_terminal());
    /// ```
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Stage::Synthesized | Stage::PlaybackStarted | Stage::Failed
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Submitted => "Submitted",
            Stage::Acquired => "Acquired",
            Stage::Transcribed => "Transcribed",
            Stage::Corrected => "Corrected",
            Stage::Synthesized => "Synthesized",
            Stage::PlaybackStarted => "PlaybackStarted",
            Stage::Failed => "Failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal stage transition {from} -> {to}")]
pub struct TransitionError {
    pub from: Stage,
    pub to: Stage,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Why a job ended in [`Stage::Failed`].
#[derive(Debug, Clone)]
pub struct JobFailure {
    /// Stage that was being attempted when the error occurred.
    pub stage: Stage,
    pub error: JobError,
}

/// One end-to-end request to turn an image into audio.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    /// Image as handed to the controller (never modified).
    pub image: PathBuf,
    /// Voice identifier as requested; resolved against the allow-list at
    /// synthesis time.
    pub voice: Option<String>,
    pub created_at: DateTime<Utc>,
    stage: Stage,
    history: Vec<Stage>,
    failure: Option<JobFailure>,
    audio: Option<PathBuf>,
    warnings: Vec<String>,
}

impl Job {
    pub fn new(image: PathBuf, voice: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            voice,
            created_at: Utc::now(),
            stage: Stage::Submitted,
            history: Vec::new(),
            failure: None,
            audio: None,
            warnings: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stages left behind, oldest first.
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn failure(&self) -> Option<&JobFailure> {
        self.failure.as_ref()
    }

    /// Result audio; only set once synthesis succeeded and the file exists.
    pub fn audio(&self) -> Option<&Path> {
        self.audio.as_deref()
    }

    /// Non-fatal problems met while running, oldest first.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Move forward to `next`.  `Failed` must go through [`Job::fail`].
    pub fn advance(&mut self, next: Stage) -> Result<(), TransitionError> {
        let legal = match next {
            Stage::Failed => false,
            Stage::PlaybackStarted => self.stage == Stage::Synthesized,
            _ => !self.stage.is_terminal() && next.rank() > self.stage.rank(),
        };
        if !legal {
            return Err(TransitionError {
                from: self.stage,
                to: next,
            });
        }
        self.history.push(self.stage);
        self.stage = next;
        Ok(())
    }

    /// Record the result audio and move to `Synthesized`.
    pub(crate) fn complete(&mut self, audio: PathBuf) -> Result<(), TransitionError> {
        self.advance(Stage::Synthesized)?;
        self.audio = Some(audio);
        Ok(())
    }

    /// Replay every working stage that precedes `attempted`, so a copy taken
    /// at `Submitted` matches a job that was lost while attempting it.
    pub(crate) fn catch_up(&mut self, attempted: Stage) {
        for stage in Stage::PIPELINE {
            if stage.rank() >= attempted.rank() || stage.rank() <= self.stage.rank() {
                continue;
            }
            if self.advance(stage).is_err() {
                break;
            }
        }
    }

    /// Route the job to `Failed`, remembering the stage being attempted.
    ///
    /// A job that is already terminal is left untouched and `false` is
    /// returned.
    pub(crate) fn fail(&mut self, stage: Stage, error: JobError) -> bool {
        if self.stage.is_terminal() {
            return false;
        }
        self.history.push(self.stage);
        self.stage = Stage::Failed;
        self.failure = Some(JobFailure { stage, error });
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::new(PathBuf::from("page.png"), None)
    }

    #[test]
    fn new_job_is_submitted() {
        let j = job();
        assert_eq!(j.stage(), Stage::Submitted);
        assert!(j.history().is_empty());
        assert!(j.failure().is_none());
        assert!(j.audio().is_none());
    }

    #[test]
    fn forward_transitions_are_recorded() {
        let mut j = job();
        j.advance(Stage::Acquired).unwrap();
        j.advance(Stage::Transcribed).unwrap();
        j.advance(Stage::Corrected).unwrap();
        assert_eq!(j.stage(), Stage::Corrected);
        assert_eq!(
            j.history(),
            &[Stage::Submitted, Stage::Acquired, Stage::Transcribed]
        );
    }

    #[test]
    fn backward_transition_is_rejected() {
        let mut j = job();
        j.advance(Stage::Transcribed).unwrap();
        let err = j.advance(Stage::Acquired).unwrap_err();
        assert_eq!(err.from, Stage::Transcribed);
        assert_eq!(j.stage(), Stage::Transcribed);
    }

    #[test]
    fn failed_only_through_fail() {
        let mut j = job();
        assert!(j.advance(Stage::Failed).is_err());
    }

    #[test]
    fn fail_records_stage_and_cause() {
        let mut j = job();
        j.advance(Stage::Acquired).unwrap();
        assert!(j.fail(Stage::Transcribed, JobError::Internal("boom".into())));
        assert_eq!(j.stage(), Stage::Failed);
        let f = j.failure().unwrap();
        assert_eq!(f.stage, Stage::Transcribed);
        assert!(f.error.to_string().contains("boom"));
    }

    #[test]
    fn terminal_job_cannot_fail_or_advance() {
        let mut j = job();
        j.complete(PathBuf::from("a.mp3")).unwrap();
        assert!(!j.fail(Stage::Synthesized, JobError::Internal("late".into())));
        assert!(j.advance(Stage::Corrected).is_err());
        assert_eq!(j.stage(), Stage::Synthesized);
        assert_eq!(j.audio(), Some(Path::new("a.mp3")));
    }

    #[test]
    fn playback_follows_synthesized_only() {
        let mut j = job();
        assert!(j.advance(Stage::PlaybackStarted).is_err());
        j.complete(PathBuf::from("a.mp3")).unwrap();
        j.advance(Stage::PlaybackStarted).unwrap();
        assert_eq!(j.stage(), Stage::PlaybackStarted);
    }

    #[test]
    fn catch_up_replays_stages_before_the_attempted_one() {
        let mut j = job();
        j.catch_up(Stage::Corrected);
        assert_eq!(j.stage(), Stage::Transcribed);
        assert_eq!(j.history(), &[Stage::Submitted, Stage::Acquired]);

        let mut fresh = job();
        fresh.catch_up(Stage::Acquired);
        assert_eq!(fresh.stage(), Stage::Submitted);
    }

    #[test]
    fn warnings_accumulate() {
        let mut j = job();
        j.warn("first");
        j.warn(String::from("second"));
        assert_eq!(j.warnings(), &["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn terminal_stages() {
        assert!(!Stage::Submitted.is_terminal());
        assert!(!Stage::Acquired.is_terminal());
        assert!(Stage::PlaybackStarted.is_terminal());
    }
}
