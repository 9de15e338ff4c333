//! edge-tts CLI adapter.
//!
//! Runs `edge-tts --voice <id> --text=<text> --write-media <out.mp3>`.
//! The text is glued to its flag so OCR output starting with `-` is not
//! taken for an option.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::call::CallContext;
use crate::config::TtsConfig;
use crate::tool::run_tool;
use crate::tts::synthesizer::{audio_path_for, SynthesisRequest, Synthesizer, TtsError};

#[derive(Debug, Clone)]
pub struct EdgeTtsSynthesizer {
    command: String,
}

impl EdgeTtsSynthesizer {
    pub fn from_config(config: &TtsConfig) -> Self {
        Self {
            command: config.command.clone(),
        }
    }

    fn args(text: &str, voice: &str, output: &Path) -> Vec<OsString> {
        let mut text_arg = OsString::from("--text=");
        text_arg.push(text);
        vec![
            "--voice".into(),
            voice.into(),
            text_arg,
            "--write-media".into(),
            output.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl Synthesizer for EdgeTtsSynthesizer {
    async fn synthesize(
        &self,
        ctx: &CallContext,
        request: SynthesisRequest,
    ) -> Result<PathBuf, TtsError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let output = audio_path_for(&request.output);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TtsError::Service(e.to_string()))?;
        }

        run_tool(ctx, &self.command, Self::args(text, request.voice.id, &output))
            .await
            .map_err(|e| TtsError::Service(e.to_string()))?;

        log::debug!("tts: wrote {} with voice {}", output.display(), request.voice);
        Ok(output)
    }
}
