//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{AppPaths, WorkDirs};
use crate::tts::DEFAULT_VOICE;

// ---------------------------------------------------------------------------
// WorkspaceConfig
// ---------------------------------------------------------------------------

/// Where job artifacts live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Root directory for the working directories.  `None` means the
    /// platform data dir from [`AppPaths`].
    pub root: Option<PathBuf>,
    /// Sub-directory for transient input copies.
    pub uploads_dir: String,
    /// Sub-directory for synthesized audio.
    pub audio_dir: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: None,
            uploads_dir: "uploads".into(),
            audio_dir: "audio".into(),
        }
    }
}

impl WorkspaceConfig {
    /// Resolve the configured layout into concrete directories.
    pub fn work_dirs(&self) -> WorkDirs {
        let root = self
            .root
            .clone()
            .unwrap_or_else(|| AppPaths::new().data_dir);
        WorkDirs::under(&root, &self.uploads_dir, &self.audio_dir)
    }
}

// ---------------------------------------------------------------------------
// OcrConfig
// ---------------------------------------------------------------------------

/// Settings for the text-recognition tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Executable invoked for recognition (must accept `<image> stdout -l <lang>`).
    pub command: String,
    /// Tesseract language pack (e.g. `"spa"`, `"eng"`).
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".into(),
            language: "spa".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CorrectionConfig
// ---------------------------------------------------------------------------

/// Settings for the grammar / spelling correction step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Whether to call LanguageTool after whitespace normalization.
    pub enabled: bool,
    /// Base URL of a LanguageTool server.
    pub base_url: String,
    /// Language code sent to LanguageTool.
    pub language: String,
    /// Maximum seconds to wait for a LanguageTool response.
    pub timeout_secs: u64,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8081".into(),
            language: "es".into(),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for speech synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Executable invoked for synthesis (edge-tts compatible flags).
    pub command: String,
    /// Voice requested when the caller does not name one.
    pub voice: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            command: "edge-tts".into(),
            voice: DEFAULT_VOICE.id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PlaybackConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Open the generated audio with the host's default handler.
    pub enabled: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Settings for the camera snapshot source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Executable that writes a single frame to a file.
    pub command: String,
    /// Arguments; the literal `{output}` is replaced with the target path.
    pub args: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            command: "fswebcam".into(),
            args: vec![
                "--no-banner".into(),
                "-r".into(),
                "640x480".into(),
                "{output}".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use ocr_to_voice::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub workspace: WorkspaceConfig,
    pub ocr: OcrConfig,
    pub correction: CorrectionConfig,
    pub tts: TtsConfig,
    pub playback: PlaybackConfig,
    pub capture: CaptureConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
