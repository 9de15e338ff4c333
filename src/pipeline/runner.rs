//! Pipeline executor: runs one job through copy → OCR → correct → TTS.
//!
//! # Pipeline flow
//!
//! ```text
//! Submitted
//!   └─▶ temp.acquire(image)                          [Acquired]
//!         └─▶ transcriber.transcribe(temp)           [Transcribed]
//!               └─▶ corrector.correct(text)          [Corrected]
//!                     ├─ blank → EmptyText           (synthesizer not called)
//!                     └─▶ synthesizer.synthesize
//!   temp.release()  ◀── always, whatever happened above
//!   verify audio exists and is .mp3                  [Synthesized]
//! any error ──▶ [Failed] with the attempted stage recorded
//! ```
//!
//! Stages run strictly in order and nothing is retried.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::call::CallContext;
use crate::config::WorkDirs;
use crate::correction::TextCorrector;
use crate::ocr::Transcriber;
use crate::tts::{audio_path_for, resolve_voice, SynthesisRequest, Synthesizer, AUDIO_EXTENSION};

use super::error::{JobError, SynthesisError};
use super::state::{Job, Stage};
use super::temp::TempResourceManager;

/// A failure tagged with the stage being attempted.
type StageResult<T> = Result<T, (Stage, JobError)>;

pub struct PipelineExecutor {
    transcriber: Arc<dyn Transcriber>,
    corrector: Arc<dyn TextCorrector>,
    synthesizer: Arc<dyn Synthesizer>,
    temp: TempResourceManager,
    audio_dir: PathBuf,
}

impl PipelineExecutor {
    /// Create a new executor.
    ///
    /// # Arguments
    ///
    /// * `transcriber`: image → text (e.g. `TesseractTranscriber`).
    /// * `corrector`: text → text (e.g. `NormalizingCorrector`).
    /// * `synthesizer`: text → audio file (e.g. `EdgeTtsSynthesizer`).
    /// * `dirs`: uploads dir for temp copies, audio dir for output.
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        corrector: Arc<dyn TextCorrector>,
        synthesizer: Arc<dyn Synthesizer>,
        dirs: &WorkDirs,
    ) -> Self {
        Self {
            transcriber,
            corrector,
            synthesizer,
            temp: TempResourceManager::new(&dirs.uploads),
            audio_dir: dirs.audio.clone(),
        }
    }

    /// Run every stage over `job`, leaving it in a terminal stage.
    ///
    /// On success the job is `Synthesized` and carries the audio path; on
    /// failure it is `Failed` with the attempted stage and cause.  The temp
    /// copy is gone in both cases, or a warning is recorded on the job.
    pub async fn run(&self, job: &mut Job) -> Result<PathBuf, JobError> {
        let (attempting, _) = watch::channel(Stage::Acquired);
        self.run_watched(job, &attempting).await
    }

    /// Like [`run`](Self::run), also publishing each stage on `attempting`
    /// before it starts.  The last value survives a panic in the stage.
    pub async fn run_watched(
        &self,
        job: &mut Job,
        attempting: &watch::Sender<Stage>,
    ) -> Result<PathBuf, JobError> {
        let ctx = CallContext::new(job.id);
        log::info!("pipeline: job {} started for {}", job.id, job.image.display());

        match self.run_stages(&ctx, job, attempting).await {
            Ok(audio) => {
                if let Err(e) = job.complete(audio.clone()) {
                    let err = JobError::Internal(e.to_string());
                    job.fail(Stage::Synthesized, err.clone());
                    return Err(err);
                }
                log::info!("pipeline: job {} synthesized {}", job.id, audio.display());
                Ok(audio)
            }
            Err((stage, err)) => {
                log::error!("pipeline: job {} failed at {stage}: {err}", job.id);
                job.fail(stage, err.clone());
                Err(err)
            }
        }
    }

    async fn run_stages(
        &self,
        ctx: &CallContext,
        job: &mut Job,
        attempting: &watch::Sender<Stage>,
    ) -> StageResult<PathBuf> {
        // ── 1. Acquire ──────────────────────────────────────────────────
        attempting.send_replace(Stage::Acquired);
        let mut artifact = self
            .temp
            .acquire(job.id, &job.image)
            .await
            .map_err(|e| (Stage::Acquired, JobError::Acquisition(e.to_string())))?;
        step(job, Stage::Acquired)?;

        // ── 2-5. Recognize, correct, synthesize ─────────────────────────
        let outcome = self
            .process(ctx, job, attempting, artifact.path().to_path_buf())
            .await;

        // ── 6. Release, whatever happened ───────────────────────────────
        if let Err(e) = self.temp.release(&mut artifact) {
            let msg = format!(
                "temporary copy {} was not removed: {e}",
                artifact.path().display()
            );
            log::warn!("pipeline: job {} {msg}", job.id);
            job.warn(msg);
        }
        drop(artifact);

        // ── 7. Verify ───────────────────────────────────────────────────
        let audio = outcome?;
        if !audio.is_file() {
            return Err((
                Stage::Synthesized,
                SynthesisError::ArtifactMissing(audio.display().to_string()).into(),
            ));
        }
        if audio.extension().and_then(|e| e.to_str()) != Some(AUDIO_EXTENSION) {
            return Err((
                Stage::Synthesized,
                SynthesisError::WrongFormat(audio.display().to_string()).into(),
            ));
        }
        Ok(audio)
    }

    async fn process(
        &self,
        ctx: &CallContext,
        job: &mut Job,
        attempting: &watch::Sender<Stage>,
        image: PathBuf,
    ) -> StageResult<PathBuf> {
        attempting.send_replace(Stage::Transcribed);
        let raw = self
            .transcriber
            .transcribe(ctx, &image)
            .await
            .map_err(|e| (Stage::Transcribed, e.into()))?;
        step(job, Stage::Transcribed)?;
        log::debug!("pipeline: job {} OCR = {:?}", job.id, raw);

        attempting.send_replace(Stage::Corrected);
        let corrected = self
            .corrector
            .correct(ctx, &raw)
            .await
            .map_err(|e| (Stage::Corrected, e.into()))?;
        step(job, Stage::Corrected)?;
        log::debug!("pipeline: job {} corrected = {:?}", job.id, corrected);

        attempting.send_replace(Stage::Synthesized);
        let text = corrected.trim();
        if text.is_empty() {
            return Err((Stage::Synthesized, SynthesisError::EmptyText.into()));
        }

        let voice = resolve_voice(job.voice.as_deref());
        let request = SynthesisRequest {
            text: text.to_string(),
            voice,
            output: audio_path_for(&self.audio_dir.join(Uuid::new_v4().to_string())),
        };

        self.synthesizer
            .synthesize(ctx, request)
            .await
            .map_err(|e| (Stage::Synthesized, SynthesisError::from(e).into()))
    }
}

fn step(job: &mut Job, next: Stage) -> StageResult<()> {
    log::debug!("pipeline: job {} {} → {next}", job.id, job.stage());
    job.advance(next)
        .map_err(|e| (next, JobError::Internal(e.to_string())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::{CorrectionError, NormalizingCorrector};
    use crate::ocr::{MockTranscriber, OcrError};
    use crate::tts::{MockSynthesizer, TtsError, DEFAULT_VOICE};
    use async_trait::async_trait;
    use std::path::Path;

    struct Fixture {
        _root: tempfile::TempDir,
        dirs: WorkDirs,
        image: PathBuf,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::under(root.path(), "uploads", "audio");
        dirs.ensure().unwrap();
        let image = root.path().join("page.png");
        std::fs::write(&image, b"png").unwrap();
        Fixture {
            _root: root,
            dirs,
            image,
        }
    }

    fn uploads_is_empty(dirs: &WorkDirs) -> bool {
        std::fs::read_dir(&dirs.uploads).unwrap().count() == 0
    }

    fn executor(
        fx: &Fixture,
        ocr: MockTranscriber,
        tts: Arc<MockSynthesizer>,
    ) -> PipelineExecutor {
        PipelineExecutor::new(
            Arc::new(ocr),
            Arc::new(NormalizingCorrector::new()),
            tts,
            &fx.dirs,
        )
    }

    struct BrokenCorrector;

    #[async_trait]
    impl TextCorrector for BrokenCorrector {
        async fn correct(&self, _ctx: &CallContext, _t: &str) -> Result<String, CorrectionError> {
            Err(CorrectionError::Timeout)
        }
    }

    #[tokio::test]
    async fn happy_path_reaches_synthesized() {
        let fx = fixture();
        let tts = Arc::new(MockSynthesizer::ok());
        let exec = executor(&fx, MockTranscriber::ok("Hola Mundo"), Arc::clone(&tts));
        let mut job = Job::new(fx.image.clone(), None);

        let audio = exec.run(&mut job).await.unwrap();

        assert_eq!(job.stage(), Stage::Synthesized);
        assert_eq!(job.audio(), Some(audio.as_path()));
        assert!(audio.is_file());
        assert_eq!(audio.extension().unwrap(), "mp3");
        assert!(audio.starts_with(&fx.dirs.audio));
        assert_eq!(
            job.history(),
            &[
                Stage::Submitted,
                Stage::Acquired,
                Stage::Transcribed,
                Stage::Corrected
            ]
        );
        let calls = tts.calls.lock().unwrap();
        assert_eq!(calls[0].text, "Hola Mundo");
        assert_eq!(calls[0].voice, DEFAULT_VOICE);
        assert!(uploads_is_empty(&fx.dirs));
    }

    #[tokio::test]
    async fn missing_input_fails_at_acquired() {
        let fx = fixture();
        let exec = executor(&fx, MockTranscriber::ok("x"), Arc::new(MockSynthesizer::ok()));
        let mut job = Job::new(fx.dirs.uploads.join("gone.png"), None);

        let err = exec.run(&mut job).await.unwrap_err();
        assert!(matches!(err, JobError::Acquisition(_)));
        assert_eq!(job.failure().unwrap().stage, Stage::Acquired);
        assert!(uploads_is_empty(&fx.dirs));
    }

    #[tokio::test]
    async fn ocr_fault_fails_at_transcribed_and_cleans_up() {
        let fx = fixture();
        let tts = Arc::new(MockSynthesizer::ok());
        let exec = executor(
            &fx,
            MockTranscriber::err(OcrError::Tool("engine crashed".into())),
            Arc::clone(&tts),
        );
        let mut job = Job::new(fx.image.clone(), None);

        let err = exec.run(&mut job).await.unwrap_err();
        assert!(matches!(err, JobError::Transcription(_)));
        assert!(err.to_string().contains("engine crashed"));
        assert_eq!(job.stage(), Stage::Failed);
        assert_eq!(job.failure().unwrap().stage, Stage::Transcribed);
        assert_eq!(tts.call_count(), 0);
        assert!(uploads_is_empty(&fx.dirs));
    }

    #[tokio::test]
    async fn correction_fault_fails_at_corrected() {
        let fx = fixture();
        let tts = Arc::new(MockSynthesizer::ok());
        let exec = PipelineExecutor::new(
            Arc::new(MockTranscriber::ok("texto")),
            Arc::new(BrokenCorrector),
            tts.clone(),
            &fx.dirs,
        );
        let mut job = Job::new(fx.image.clone(), None);

        let err = exec.run(&mut job).await.unwrap_err();
        assert!(matches!(err, JobError::Correction(_)));
        assert_eq!(job.failure().unwrap().stage, Stage::Corrected);
        assert_eq!(tts.call_count(), 0);
        assert!(uploads_is_empty(&fx.dirs));
    }

    #[tokio::test]
    async fn blank_text_never_reaches_synthesizer() {
        for blank in ["", "   ", "\n\t "] {
            let fx = fixture();
            let tts = Arc::new(MockSynthesizer::ok());
            let exec = executor(&fx, MockTranscriber::ok(blank), Arc::clone(&tts));
            let mut job = Job::new(fx.image.clone(), None);

            let err = exec.run(&mut job).await.unwrap_err();
            assert!(matches!(
                err,
                JobError::Synthesis(SynthesisError::EmptyText)
            ));
            assert_eq!(tts.call_count(), 0);
            assert!(job.audio().is_none());
            assert!(uploads_is_empty(&fx.dirs));
        }
    }

    #[tokio::test]
    async fn unknown_voice_is_remapped() {
        let fx = fixture();
        let tts = Arc::new(MockSynthesizer::ok());
        let exec = executor(&fx, MockTranscriber::ok("Hola"), Arc::clone(&tts));
        let mut job = Job::new(fx.image.clone(), Some("xx-YY-Ghost".into()));

        exec.run(&mut job).await.unwrap();
        assert_eq!(tts.calls.lock().unwrap()[0].voice, DEFAULT_VOICE);
    }

    #[tokio::test]
    async fn listed_voice_is_passed_through() {
        let fx = fixture();
        let tts = Arc::new(MockSynthesizer::ok());
        let exec = executor(&fx, MockTranscriber::ok("Hola"), Arc::clone(&tts));
        let mut job = Job::new(fx.image.clone(), Some("es-ES-ElviraNeural".into()));

        exec.run(&mut job).await.unwrap();
        assert_eq!(tts.calls.lock().unwrap()[0].voice.id, "es-ES-ElviraNeural");
    }

    #[tokio::test]
    async fn synthesizer_fault_is_synthesis_error() {
        let fx = fixture();
        let tts = Arc::new(MockSynthesizer::err(TtsError::Service("503".into())));
        let exec = executor(&fx, MockTranscriber::ok("Hola"), tts);
        let mut job = Job::new(fx.image.clone(), None);

        let err = exec.run(&mut job).await.unwrap_err();
        assert!(matches!(err, JobError::Synthesis(SynthesisError::Service(_))));
        assert_eq!(job.failure().unwrap().stage, Stage::Synthesized);
        assert!(uploads_is_empty(&fx.dirs));
    }

    #[tokio::test]
    async fn missing_output_is_artifact_missing() {
        let fx = fixture();
        let exec = executor(
            &fx,
            MockTranscriber::ok("Hola"),
            Arc::new(MockSynthesizer::phantom()),
        );
        let mut job = Job::new(fx.image.clone(), None);

        let err = exec.run(&mut job).await.unwrap_err();
        assert!(matches!(
            err,
            JobError::Synthesis(SynthesisError::ArtifactMissing(_))
        ));
        assert!(job.audio().is_none());
        assert!(uploads_is_empty(&fx.dirs));
    }

    #[tokio::test]
    async fn input_image_is_left_alone() {
        let fx = fixture();
        let exec = executor(&fx, MockTranscriber::ok("Hola"), Arc::new(MockSynthesizer::ok()));
        let mut job = Job::new(fx.image.clone(), None);
        exec.run(&mut job).await.unwrap();
        assert!(fx.image.exists());
    }

    /// Writes `.wav` instead of the fixed audio format.
    struct WavSynthesizer;

    #[async_trait]
    impl Synthesizer for WavSynthesizer {
        async fn synthesize(
            &self,
            _ctx: &CallContext,
            request: SynthesisRequest,
        ) -> Result<PathBuf, TtsError> {
            let out = request.output.with_extension("wav");
            std::fs::write(&out, b"RIFF").map_err(|e| TtsError::Service(e.to_string()))?;
            Ok(out)
        }
    }

    /// Swaps the temp copy for a directory so it cannot be removed as a file.
    struct SwappingTranscriber;

    #[async_trait]
    impl Transcriber for SwappingTranscriber {
        async fn transcribe(&self, _ctx: &CallContext, image: &Path) -> Result<String, OcrError> {
            std::fs::remove_file(image).unwrap();
            std::fs::create_dir(image).unwrap();
            Ok("Hola".into())
        }
    }

    #[tokio::test]
    async fn non_mp3_output_is_rejected() {
        let fx = fixture();
        let exec = PipelineExecutor::new(
            Arc::new(MockTranscriber::ok("Hola")),
            Arc::new(NormalizingCorrector::new()),
            Arc::new(WavSynthesizer),
            &fx.dirs,
        );
        let mut job = Job::new(fx.image.clone(), None);

        let err = exec.run(&mut job).await.unwrap_err();
        assert!(matches!(
            err,
            JobError::Synthesis(SynthesisError::WrongFormat(_))
        ));
        assert!(job.audio().is_none());
        assert_eq!(job.failure().unwrap().stage, Stage::Synthesized);
    }

    #[tokio::test]
    async fn failed_cleanup_is_recorded_as_warning() {
        let fx = fixture();
        let exec = PipelineExecutor::new(
            Arc::new(SwappingTranscriber),
            Arc::new(NormalizingCorrector::new()),
            Arc::new(MockSynthesizer::ok()),
            &fx.dirs,
        );
        let mut job = Job::new(fx.image.clone(), None);

        exec.run(&mut job).await.unwrap();
        assert_eq!(job.warnings().len(), 1);
        assert!(job.warnings()[0].contains("was not removed"));
    }

    #[tokio::test]
    async fn attempted_stage_is_published_as_it_goes() {
        let fx = fixture();
        let exec = executor(
            &fx,
            MockTranscriber::err(OcrError::Tool("x".into())),
            Arc::new(MockSynthesizer::ok()),
        );
        let (tx, rx) = watch::channel(Stage::Acquired);
        let mut job = Job::new(fx.image.clone(), None);

        exec.run_watched(&mut job, &tx).await.unwrap_err();
        assert_eq!(*rx.borrow(), Stage::Transcribed);
    }
}
