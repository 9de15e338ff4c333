//! Text recognition (OCR) module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             Transcriber (trait)              │
//! │                                              │
//! │   ┌────────────┐     ┌──────────────────┐    │
//! │   │ OcrConfig  │────▶│TesseractTranscr. │    │
//! │   │ - command  │     │ - run_tool()     │    │
//! │   │ - language │     └────────┬─────────┘    │
//! │   └────────────┘              ▼              │
//! │                     image path → text        │
//! └──────────────────────────────────────────────┘
//! ```

pub mod tesseract;
pub mod transcriber;

pub use tesseract::TesseractTranscriber;
pub use transcriber::{OcrError, Transcriber};

#[cfg(test)]
pub use transcriber::MockTranscriber;
