//! Application entry point: OCR to Voice.
//!
//! # Startup sequence
//!
//! 1. Parse the command line.
//! 2. Initialise logging.
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Create the working directories.
//! 5. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 6. Build the collaborators and the [`JobController`].
//! 7. Run the owner loop: submit one image, wait for its outcome, complete
//!    it, print the notice, then move on to the next image.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ocr_to_voice::{
    acquire::CameraCapture,
    config::AppConfig,
    correction::NormalizingCorrector,
    ocr::TesseractTranscriber,
    pipeline::{JobController, OutcomeReceiver, PipelineExecutor, SpinnerProgress, SubmitError},
    playback::{PlaybackInvoker, SilentPlayback, SystemPlayback},
    tts::EdgeTtsSynthesizer,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "ocr-to-voice", version, about = "Read text from images aloud")]
struct Cli {
    /// Voice identifier (unknown voices fall back to the default voice).
    #[arg(long)]
    voice: Option<String>,

    /// Take a camera snapshot and read it before any IMAGE.
    #[arg(long)]
    capture: bool,

    /// Settings file to use instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image files to read, one job after another.
    images: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Owner loop
// ---------------------------------------------------------------------------

/// Input the owner loop feeds to the controller, in order.
enum Trigger {
    Capture,
    File(PathBuf),
}

/// Handles one trigger end to end.  Returns `false` if the job failed or
/// could not be submitted.
async fn handle_trigger(
    controller: &JobController,
    outcomes: &mut OutcomeReceiver,
    camera: &CameraCapture,
    trigger: Trigger,
    voice: Option<String>,
) -> bool {
    let submitted = match trigger {
        Trigger::Capture => controller.submit_capture(camera, voice).await,
        Trigger::File(path) => controller.submit_file(&path, voice),
    };

    match submitted {
        Ok(Some(handle)) => log::debug!("job {} submitted", handle.id),
        Ok(None) => {
            println!("Cancelled, nothing to read.");
            return true;
        }
        Err(e @ SubmitError::Busy) => {
            log::warn!("previous job still running");
            eprintln!("Error: {e}");
            return false;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return false;
        }
    }

    let Some(delivery) = outcomes.recv().await else {
        eprintln!("Error: job ended without reporting an outcome");
        return false;
    };
    let done = controller.complete(delivery);
    if done.notice.is_success() {
        println!("{}", done.notice);
        true
    } else {
        eprintln!("{}", done.notice);
        false
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    // 1. Command line
    let cli = Cli::parse();

    // 2. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("OCR to Voice starting up");

    // 3. Configuration
    let loaded = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 4. Working directories
    let dirs = config.workspace.work_dirs();
    dirs.ensure()
        .with_context(|| format!("cannot create {}", dirs.uploads.display()))?;

    // 5. Tokio runtime (2 worker threads: owner loop + one job)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 6. Collaborators
    let executor = PipelineExecutor::new(
        Arc::new(TesseractTranscriber::from_config(&config.ocr)),
        Arc::new(NormalizingCorrector::from_config(&config.correction)),
        Arc::new(EdgeTtsSynthesizer::from_config(&config.tts)),
        &dirs,
    );
    let playback: Arc<dyn PlaybackInvoker> = if config.playback.enabled {
        Arc::new(SystemPlayback)
    } else {
        Arc::new(SilentPlayback)
    };
    let camera = CameraCapture::from_config(&config.capture, &dirs.uploads);

    let mut triggers = Vec::new();
    if cli.capture {
        triggers.push(Trigger::Capture);
    }
    triggers.extend(cli.images.into_iter().map(Trigger::File));
    if triggers.is_empty() {
        eprintln!("Nothing to do: pass an IMAGE or --capture (see --help)");
        return Ok(ExitCode::from(2));
    }

    let voice = cli.voice.or_else(|| Some(config.tts.voice.clone()));

    // 7. Owner loop
    let all_ok = rt.block_on(async {
        let (controller, mut outcomes) = JobController::new(executor, playback);
        let controller = controller.with_progress(Arc::new(SpinnerProgress::new()));

        let mut all_ok = true;
        for trigger in triggers {
            all_ok &=
                handle_trigger(&controller, &mut outcomes, &camera, trigger, voice.clone()).await;
        }
        all_ok
    });

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
