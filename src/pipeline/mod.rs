//! Job orchestration for image-to-voice.
//!
//! This module takes one image at a time through OCR → correction → TTS on a
//! background tokio task and hands the outcome back to the owner context.
//!
//! # Architecture
//!
//! ```text
//! owner context                         background task
//! ─────────────                         ───────────────
//! JobController::submit(image)
//!   ├─ Admission::try_acquire  ──Busy──▶ Err(SubmitError::Busy)
//!   └─ tokio::spawn ──────────────────▶ PipelineExecutor::run(job)
//!                                         ├─ TempResourceManager::acquire
//!                                         ├─ Transcriber / TextCorrector
//!                                         ├─ Synthesizer
//!                                         └─ TempArtifact released
//!                                       ResultDispatcher::dispatch
//! OutcomeReceiver::recv  ◀──── mpsc ────┘
//! JobController::complete(delivery)
//!   ├─ ProgressIndicator::stop
//!   ├─ admission reopens
//!   └─ PlaybackInvoker::play | Notice::Failure
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use ocr_to_voice::config::AppConfig;
//! use ocr_to_voice::correction::NormalizingCorrector;
//! use ocr_to_voice::ocr::TesseractTranscriber;
//! use ocr_to_voice::pipeline::{JobController, PipelineExecutor};
//! use ocr_to_voice::playback::SystemPlayback;
//! use ocr_to_voice::tts::EdgeTtsSynthesizer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     let dirs = config.workspace.work_dirs();
//!     dirs.ensure()?;
//!
//!     let executor = PipelineExecutor::new(
//!         Arc::new(TesseractTranscriber::from_config(&config.ocr)),
//!         Arc::new(NormalizingCorrector::from_config(&config.correction)),
//!         Arc::new(EdgeTtsSynthesizer::from_config(&config.tts)),
//!         &dirs,
//!     );
//!     let (controller, mut outcomes) = JobController::new(executor, Arc::new(SystemPlayback));
//!
//!     controller.submit(PathBuf::from("page.png"), None)?;
//!     if let Some(delivery) = outcomes.recv().await {
//!         println!("{}", controller.complete(delivery).notice);
//!     }
//!     Ok(())
//! }
//! ```

pub mod admission;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod progress;
pub mod runner;
pub mod state;
pub mod temp;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use admission::{Admission, AdmissionPermit};
pub use controller::{Completion, JobController, JobHandle, Notice, SubmitError};
pub use dispatch::{Delivery, JobOutcome, OutcomeReceiver, ResultDispatcher};
pub use error::{JobError, SynthesisError};
pub use progress::{NoProgress, ProgressIndicator, SpinnerProgress};
pub use runner::PipelineExecutor;
pub use state::{Job, JobFailure, Stage, TransitionError};
pub use temp::{AcquireError, TempArtifact, TempResourceManager};
