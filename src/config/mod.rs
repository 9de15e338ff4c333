//! Configuration module for OCR-to-Voice.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each
//! collaborator, `AppPaths` / `WorkDirs` for data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::{AppPaths, WorkDirs};
pub use settings::{
    AppConfig, CaptureConfig, CorrectionConfig, OcrConfig, PlaybackConfig, TtsConfig,
    WorkspaceConfig,
};
