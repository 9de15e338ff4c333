//! Core `Synthesizer` trait, request type and error type.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::call::CallContext;
use crate::tts::voice::VoiceProfile;

/// Extension of every synthesized artifact, whatever the caller asked for.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Force `output` onto [`AUDIO_EXTENSION`].
///
/// ```
/// use std::path::Path;
/// use ocr_to_voice::tts::audio_path_for;
///
/// assert_eq!(audio_path_for(Path::new("out/a.wav")), Path::new("out/a.mp3"));
/// ```
pub fn audio_path_for(output: &Path) -> PathBuf {
    output.with_extension(AUDIO_EXTENSION)
}

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum TtsError {
    /// Text was empty or whitespace-only.
    #[error("empty text")]
    EmptyText,

    /// The speech service failed.
    #[error("speech service failed: {0}")]
    Service(String),
}

// ---------------------------------------------------------------------------
// SynthesisRequest
// ---------------------------------------------------------------------------

/// Everything a synthesizer needs for one call.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    /// Already resolved against the allow-list.
    pub voice: VoiceProfile,
    /// Desired output location; the extension is replaced by
    /// [`AUDIO_EXTENSION`].
    pub output: PathBuf,
}

// ---------------------------------------------------------------------------
// Synthesizer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for text-to-speech.
///
/// # Contract
///
/// - Returns `Err(TtsError::EmptyText)` when `request.text` trims to empty.
/// - On success returns the path actually written, which always ends in
///   [`AUDIO_EXTENSION`].
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(
        &self,
        ctx: &CallContext,
        request: SynthesisRequest,
    ) -> Result<PathBuf, TtsError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Synthesizer>) {}
};

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// Test double that records every request and writes a small file at the
/// forced-extension path.
#[cfg(test)]
pub struct MockSynthesizer {
    pub calls: std::sync::Mutex<Vec<SynthesisRequest>>,
    fail_with: Option<TtsError>,
    write_file: bool,
}

#[cfg(test)]
impl MockSynthesizer {
    pub fn ok() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            fail_with: None,
            write_file: true,
        }
    }

    pub fn err(error: TtsError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::ok()
        }
    }

    /// Reports success without writing anything to disk.
    pub fn phantom() -> Self {
        Self {
            write_file: false,
            ..Self::ok()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(
        &self,
        _ctx: &CallContext,
        request: SynthesisRequest,
    ) -> Result<PathBuf, TtsError> {
        self.calls.lock().unwrap().push(request.clone());
        if request.text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }
        if let Some(e) = &self.fail_with {
            return Err(e.clone());
        }
        let path = audio_path_for(&request.output);
        if self.write_file {
            std::fs::write(&path, b"ID3").map_err(|e| TtsError::Service(e.to_string()))?;
        }
        Ok(path)
    }
}
