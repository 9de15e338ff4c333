//! Core `Transcriber` trait and its error type.
//!
//! [`Transcriber`] is the interface the pipeline uses to turn an image file
//! into text.  It is object-safe and `Send + Sync` so it can be held behind
//! an `Arc<dyn Transcriber>`.
//!
//! [`MockTranscriber`] (available under `#[cfg(test)]`) returns a
//! pre-configured response without running any recognition tool.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::call::CallContext;

// ---------------------------------------------------------------------------
// OcrError
// ---------------------------------------------------------------------------

/// All errors that can arise from the recognition subsystem.
#[derive(Debug, Clone, Error)]
pub enum OcrError {
    /// The image handed to the transcriber does not exist.
    #[error("image not found: {0}")]
    ImageNotFound(String),

    /// The recognition tool could not be run or exited with an error.
    #[error("recognition tool failed: {0}")]
    Tool(String),

    /// Recognition output was unusable (e.g. not valid text).
    #[error("recognition failed: {0}")]
    Recognition(String),
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for image-to-text recognition.
///
/// An image with no recognizable text yields `Ok(String::new())`, not an
/// error; deciding what to do with empty text is the caller's business.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, ctx: &CallContext, image: &Path) -> Result<String, OcrError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response.
///
/// It checks that the image exists, so the pipeline is tested against the
/// same contract as a real recognizer.
#[cfg(test)]
pub struct MockTranscriber {
    response: Result<String, OcrError>,
}

#[cfg(test)]
impl MockTranscriber {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    pub fn err(error: OcrError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _ctx: &CallContext, image: &Path) -> Result<String, OcrError> {
        if !image.exists() {
            return Err(OcrError::ImageNotFound(image.display().to_string()));
        }
        self.response.clone()
    }
}
