//! Errors that end a job.
//!
//! Every variant carries a human-readable description so the owner context
//! can show it without knowing the internal cause.

use thiserror::Error;

use crate::correction::CorrectionError;
use crate::ocr::OcrError;
use crate::tts::TtsError;

/// Synthesis-stage failures.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    /// Corrected text was empty; the synthesizer was not called.
    #[error("empty text")]
    EmptyText,

    #[error("{0}")]
    Service(String),

    /// The synthesizer reported success but the file is not on disk.
    #[error("artifact missing: {0}")]
    ArtifactMissing(String),

    /// The synthesizer wrote something other than the fixed audio format.
    #[error("unexpected audio format: {0}")]
    WrongFormat(String),
}

impl From<TtsError> for SynthesisError {
    fn from(e: TtsError) -> Self {
        match e {
            TtsError::EmptyText => SynthesisError::EmptyText,
            TtsError::Service(msg) => SynthesisError::Service(msg),
        }
    }
}

/// The single cause recorded on a failed job.
#[derive(Debug, Clone, Error)]
pub enum JobError {
    /// The input image could not be copied into the workspace.
    #[error("could not read image: {0}")]
    Acquisition(String),

    #[error("text recognition failed: {0}")]
    Transcription(#[from] OcrError),

    #[error("text correction failed: {0}")]
    Correction(#[from] CorrectionError),

    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// The background task died or the state machine was misused.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_reads_naturally() {
        let e = JobError::from(SynthesisError::EmptyText);
        assert_eq!(e.to_string(), "speech synthesis failed: empty text");
    }

    #[test]
    fn collaborator_message_is_kept() {
        let e = JobError::from(OcrError::Tool("tesseract crashed".into()));
        assert!(e.to_string().contains("tesseract crashed"));
    }

    #[test]
    fn tts_errors_map_onto_synthesis_subtypes() {
        assert!(matches!(
            SynthesisError::from(TtsError::EmptyText),
            SynthesisError::EmptyText
        ));
        assert!(matches!(
            SynthesisError::from(TtsError::Service("503".into())),
            SynthesisError::Service(ref m) if m.contains("503")
        ));
    }
}
