//! Transient per-job copies of the input image.
//!
//! [`TempResourceManager::acquire`] copies the input into
//! `<uploads>/<uuid>.<ext>`.  The returned [`TempArtifact`] deletes its file
//! on [`TempArtifact::release`] or, failing that, on drop, so the copy is
//! removed on every exit path of the pipeline including a panicking stage.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("cannot copy {src} into {dst}: {source}")]
    Copy {
        src: String,
        dst: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// TempArtifact
// ---------------------------------------------------------------------------

/// A transient file owned by exactly one job.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    job_id: Uuid,
    released: bool,
}

impl TempArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Delete the file.  Returns `Ok(true)` if this call removed it and
    /// `Ok(false)` if it was already gone; repeated calls are no-ops.
    pub fn release(&mut self) -> std::io::Result<bool> {
        if self.released {
            return Ok(false);
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                self.released = true;
                log::debug!("temp: removed {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.released = true;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("temp: could not remove {}: {e}", self.path.display());
        }
    }
}

// ---------------------------------------------------------------------------
// TempResourceManager
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TempResourceManager {
    dir: PathBuf,
}

impl TempResourceManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Unique path for a copy of `source`, keeping its extension.
    fn fresh_path(&self, source: &Path) -> PathBuf {
        let token = Uuid::new_v4().to_string();
        match source.extension() {
            Some(ext) => self.dir.join(token).with_extension(ext),
            None => self.dir.join(token),
        }
    }

    /// Copy `source` into a fresh artifact owned by `job_id`.
    pub async fn acquire(&self, job_id: Uuid, source: &Path) -> Result<TempArtifact, AcquireError> {
        // Constructed before copying so a partial file is cleaned up on error.
        let artifact = TempArtifact {
            path: self.fresh_path(source),
            job_id,
            released: false,
        };

        tokio::fs::copy(source, &artifact.path)
            .await
            .map_err(|e| AcquireError::Copy {
                src: source.display().to_string(),
                dst: artifact.path.display().to_string(),
                source: e,
            })?;

        log::debug!(
            "temp: job {job_id} copied {} -> {}",
            source.display(),
            artifact.path.display()
        );
        Ok(artifact)
    }

    /// Release `artifact`; see [`TempArtifact::release`].
    pub fn release(&self, artifact: &mut TempArtifact) -> std::io::Result<bool> {
        artifact.release()
    }
}
