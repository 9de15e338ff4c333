//! Acquisition sources: where input images come from.
//!
//! Two sources exist: a file selected by the user ([`select_file`]) and a
//! camera snapshot ([`CameraCapture`]).  Either yields an [`Acquisition`]:
//! an image to submit, or `Cancelled` when the user backed out before any
//! image existed.  A cancelled acquisition never reaches the job controller.

pub mod capture;
pub mod file;

use std::path::PathBuf;

use thiserror::Error;

pub use capture::CameraCapture;
pub use file::{is_supported_image, select_file, IMAGE_EXTENSIONS};

/// What an acquisition source produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Acquisition {
    Image(PathBuf),
    Cancelled,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("unsupported image type: {0}")]
    Unsupported(String),

    #[error("camera unavailable: {0}")]
    Camera(String),
}
