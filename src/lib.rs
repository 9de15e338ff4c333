//! Image → OCR → correction → TTS → playback.
//!
//! The [`pipeline`] module holds the job orchestration; every other module
//! is a collaborator it drives or a source that feeds it.

pub mod acquire;
pub mod call;
pub mod config;
pub mod correction;
pub mod ocr;
pub mod pipeline;
pub mod playback;
pub mod tool;
pub mod tts;
