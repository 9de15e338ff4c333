//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\ocr-to-voice\
//!   macOS:   ~/Library/Application Support/ocr-to-voice/
//!   Linux:   ~/.config/ocr-to-voice/
//!
//! Data dir (working directories for uploads and generated audio):
//!   Windows: %LOCALAPPDATA%\ocr-to-voice\
//!   macOS:   ~/Library/Application Support/ocr-to-voice/
//!   Linux:   ~/.local/share/ocr-to-voice/

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Default root of the job working directories.
    pub data_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "ocr-to-voice";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");

        Self {
            config_dir,
            settings_file,
            data_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// The two working directories every job touches.
///
/// `uploads` holds transient input copies, `audio` holds synthesized output.
/// Both are created by [`WorkDirs::ensure`] at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkDirs {
    pub uploads: PathBuf,
    pub audio: PathBuf,
}

impl WorkDirs {
    pub fn under(root: &Path, uploads: &str, audio: &str) -> Self {
        Self {
            uploads: root.join(uploads),
            audio: root.join(audio),
        }
    }

    /// Create both directories if they are missing.
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.uploads)?;
        std::fs::create_dir_all(&self.audio)?;
        Ok(())
    }
}
