//! Playback: hands a finished audio file to the host's default handler.
//!
//! Playback is best-effort: a [`PlaybackError`] is reported to the user as a
//! warning but never turns a successful job into a failed one.

use std::path::Path;

use thiserror::Error;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio file vanished before it could be opened.
    #[error("audio file not found: {0}")]
    NotFound(String),

    /// The host could not launch a handler for the file.
    #[error("cannot open audio file: {0}")]
    Open(String),
}

// ---------------------------------------------------------------------------
// PlaybackInvoker trait
// ---------------------------------------------------------------------------

/// Fire-and-forget playback.  Implementations must not block until playback
/// finishes.
pub trait PlaybackInvoker: Send + Sync {
    fn play(&self, audio: &Path) -> Result<(), PlaybackError>;
}

// ---------------------------------------------------------------------------
// SystemPlayback
// ---------------------------------------------------------------------------

/// Opens the file with the desktop's default application (`xdg-open`,
/// `open`, or `start`, via the `open` crate).
#[derive(Debug, Clone, Default)]
pub struct SystemPlayback;

impl PlaybackInvoker for SystemPlayback {
    fn play(&self, audio: &Path) -> Result<(), PlaybackError> {
        if !audio.exists() {
            return Err(PlaybackError::NotFound(audio.display().to_string()));
        }
        open::that_detached(audio).map_err(|e| PlaybackError::Open(e.to_string()))?;
        log::info!("playback: opened {}", audio.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SilentPlayback
// ---------------------------------------------------------------------------

/// Used when playback is disabled in config; only logs the path.
#[derive(Debug, Clone, Default)]
pub struct SilentPlayback;

impl PlaybackInvoker for SilentPlayback {
    fn play(&self, audio: &Path) -> Result<(), PlaybackError> {
        log::info!("playback: disabled, audio left at {}", audio.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockPlayback  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
#[derive(Default)]
pub struct MockPlayback {
    pub played: std::sync::Mutex<Vec<std::path::PathBuf>>,
    pub fail: bool,
}

#[cfg(test)]
impl MockPlayback {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl PlaybackInvoker for MockPlayback {
    fn play(&self, audio: &Path) -> Result<(), PlaybackError> {
        self.played.lock().unwrap().push(audio.to_path_buf());
        if self.fail {
            return Err(PlaybackError::Open("no default handler".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_playback_rejects_missing_file() {
        let err = SystemPlayback
            .play(Path::new("/nonexistent/out.mp3"))
            .unwrap_err();
        assert!(matches!(err, PlaybackError::NotFound(_)));
    }

    #[test]
    fn silent_playback_always_succeeds() {
        assert!(SilentPlayback.play(Path::new("/nonexistent/out.mp3")).is_ok());
    }

    #[test]
    fn mock_records_and_can_fail() {
        let p = MockPlayback::failing();
        assert!(p.play(Path::new("a.mp3")).is_err());
        assert_eq!(p.played.lock().unwrap().len(), 1);
    }
}
