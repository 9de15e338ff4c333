//! Runs external command-line tools on behalf of collaborator adapters.
//!
//! Recognition, synthesis and camera capture are all delegated to CLI tools.
//! [`run_tool`] spawns the process with `kill_on_drop`, races it against the
//! call's cancellation token and deadline, and maps launch / exit failures
//! into a [`ToolError`].

use std::ffi::OsStr;
use std::process::Output;

use thiserror::Error;
use tokio::process::Command;

use crate::call::CallContext;

#[derive(Debug, Error)]
pub enum ToolError {
    /// The executable is not on `PATH`.
    #[error("{tool} not found in PATH")]
    NotFound { tool: String },

    /// The process could not be started for another reason.
    #[error("failed to start {tool}: {message}")]
    Spawn { tool: String, message: String },

    /// The process ran but exited unsuccessfully.
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// The call context was cancelled or its deadline passed.
    #[error("{tool} was abandoned before it finished")]
    Abandoned { tool: String },
}

/// Run `program` with `args` to completion and return its output.
///
/// A non-zero exit status is reported as [`ToolError::Failed`] carrying the
/// trimmed stderr.
pub async fn run_tool<I, S>(ctx: &CallContext, program: &str, args: I) -> Result<Output, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true)
        .output();

    let deadline = async {
        match ctx.deadline {
            Some(at) => tokio::time::sleep_until(at.into()).await,
            None => std::future::pending::<()>().await,
        }
    };

    let output = tokio::select! {
        res = child => res.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound { tool: program.to_string() }
            } else {
                ToolError::Spawn { tool: program.to_string(), message: e.to_string() }
            }
        })?,
        _ = ctx.cancel.cancelled() => {
            return Err(ToolError::Abandoned { tool: program.to_string() });
        }
        _ = deadline => {
            return Err(ToolError::Abandoned { tool: program.to_string() });
        }
    };

    if !output.status.success() {
        return Err(ToolError::Failed {
            tool: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_tool_is_not_found() {
        let ctx = CallContext::detached();
        let err = run_tool(&ctx, "definitely-not-a-real-tool-4711", ["x"])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn cancelled_context_abandons_call() {
        let ctx = CallContext::detached();
        ctx.cancel.cancel();
        // `sleep` may or may not exist; either way the call must not succeed.
        let res = run_tool(&ctx, "sleep", ["5"]).await;
        assert!(res.is_err());
    }

    #[test]
    fn failed_display_includes_stderr() {
        let e = ToolError::Failed {
            tool: "tesseract".into(),
            status: "exit status: 1".into(),
            stderr: "cannot read image".into(),
        };
        assert!(e.to_string().contains("cannot read image"));
    }
}
