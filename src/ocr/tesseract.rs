//! Tesseract CLI adapter.
//!
//! Runs `tesseract <image> stdout -l <language>` and returns the trimmed
//! stdout.  All connection details come from [`OcrConfig`].

use std::path::Path;

use async_trait::async_trait;

use crate::call::CallContext;
use crate::config::OcrConfig;
use crate::ocr::transcriber::{OcrError, Transcriber};
use crate::tool::run_tool;

#[derive(Debug, Clone)]
pub struct TesseractTranscriber {
    command: String,
    language: String,
}

impl TesseractTranscriber {
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            language: config.language.clone(),
        }
    }

    fn args(&self, image: &Path) -> Vec<std::ffi::OsString> {
        vec![
            image.as_os_str().to_owned(),
            "stdout".into(),
            "-l".into(),
            self.language.clone().into(),
        ]
    }
}

#[async_trait]
impl Transcriber for TesseractTranscriber {
    async fn transcribe(&self, ctx: &CallContext, image: &Path) -> Result<String, OcrError> {
        if !image.exists() {
            return Err(OcrError::ImageNotFound(image.display().to_string()));
        }

        let output = run_tool(ctx, &self.command, self.args(image))
            .await
            .map_err(|e| OcrError::Tool(e.to_string()))?;

        let text = String::from_utf8(output.stdout)
            .map_err(|e| OcrError::Recognition(format!("output is not UTF-8: {e}")))?;

        log::debug!("ocr: recognized {} chars from {}", text.len(), image.display());
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcriber(command: &str) -> TesseractTranscriber {
        TesseractTranscriber::from_config(&OcrConfig {
            command: command.into(),
            language: "spa".into(),
        })
    }

    #[test]
    fn args_put_image_first_and_language_last() {
        let t = transcriber("tesseract");
        let args = t.args(Path::new("/tmp/a.png"));
        assert_eq!(args[0], "/tmp/a.png");
        assert_eq!(args[1], "stdout");
        assert_eq!(args[2], "-l");
        assert_eq!(args[3], "spa");
    }

    #[tokio::test]
    async fn missing_image_is_rejected_before_running_tool() {
        let t = transcriber("tesseract");
        let err = t
            .transcribe(&CallContext::detached(), Path::new("/nonexistent/x.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::ImageNotFound(_)));
    }

    #[tokio::test]
    async fn missing_tool_maps_to_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("x.png");
        std::fs::write(&img, b"png").unwrap();

        let t = transcriber("no-such-ocr-binary-4711");
        let err = t
            .transcribe(&CallContext::detached(), &img)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Tool(ref m) if m.contains("not found")));
    }
}
