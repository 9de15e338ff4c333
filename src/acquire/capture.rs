//! Camera snapshot source.
//!
//! Runs the configured capture command (default `fswebcam`) with `{output}`
//! replaced by `<uploads>/<uuid>.jpg`.  A command that exits cleanly without
//! leaving a frame behind, or a call abandoned through its context, counts
//! as cancelled by the user.  A missing tool or a failing camera is a
//! [`SourceError::Camera`].

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{Acquisition, SourceError};
use crate::call::CallContext;
use crate::config::CaptureConfig;
use crate::tool::{run_tool, ToolError};

const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone)]
pub struct CameraCapture {
    command: String,
    args: Vec<String>,
    uploads: PathBuf,
}

impl CameraCapture {
    pub fn from_config(config: &CaptureConfig, uploads: &Path) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            uploads: uploads.to_path_buf(),
        }
    }

    fn args_for(&self, output: &Path) -> Vec<String> {
        let target = output.display().to_string();
        self.args
            .iter()
            .map(|a| a.replace(OUTPUT_PLACEHOLDER, &target))
            .collect()
    }

    /// Take one snapshot.
    pub async fn capture(&self, ctx: &CallContext) -> Result<Acquisition, SourceError> {
        let output = self.uploads.join(format!("{}.jpg", Uuid::new_v4()));

        match run_tool(ctx, &self.command, self.args_for(&output)).await {
            Ok(_) if output.is_file() => {
                log::info!("capture: snapshot saved to {}", output.display());
                Ok(Acquisition::Image(output))
            }
            Ok(_) => {
                log::info!("capture: no snapshot produced, treating as cancelled");
                Ok(Acquisition::Cancelled)
            }
            Err(ToolError::NotFound { tool }) => Err(SourceError::Camera(format!(
                "{tool} not found in PATH"
            ))),
            Err(ToolError::Spawn { message, .. }) => Err(SourceError::Camera(message)),
            Err(e @ ToolError::Failed { .. }) => {
                discard_partial(&output);
                log::warn!("capture: camera failed ({e})");
                Err(SourceError::Camera(e.to_string()))
            }
            Err(e @ ToolError::Abandoned { .. }) => {
                discard_partial(&output);
                log::info!("capture: aborted ({e})");
                Ok(Acquisition::Cancelled)
            }
        }
    }
}

/// A partial frame must not be left behind.
fn discard_partial(output: &Path) {
    match std::fs::remove_file(output) {
        Ok(()) => log::debug!("capture: removed partial frame {}", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::debug!("capture: could not remove {}: {e}", output.display()),
    }
}
