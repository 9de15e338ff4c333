//! Core `TextCorrector` trait and the `NormalizingCorrector` front end.

use async_trait::async_trait;
use thiserror::Error;

use crate::call::CallContext;
use crate::config::CorrectionConfig;
use crate::correction::languagetool::LanguageToolCorrector;
use crate::correction::normalize::normalize_whitespace;

// ---------------------------------------------------------------------------
// CorrectionError
// ---------------------------------------------------------------------------

/// Errors that can occur during text correction.
#[derive(Debug, Clone, Error)]
pub enum CorrectionError {
    /// HTTP transport or connection error.
    #[error("correction request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("correction request timed out")]
    Timeout,

    /// The response could not be parsed as expected JSON.
    #[error("failed to parse correction response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CorrectionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CorrectionError::Timeout
        } else {
            CorrectionError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TextCorrector trait
// ---------------------------------------------------------------------------

/// Async trait for text normalization / correction.
///
/// Implementations must be pure with respect to their input: the same text
/// always yields the same corrected text.
#[async_trait]
pub trait TextCorrector: Send + Sync {
    async fn correct(&self, ctx: &CallContext, text: &str) -> Result<String, CorrectionError>;
}

// ---------------------------------------------------------------------------
// NormalizingCorrector
// ---------------------------------------------------------------------------

/// Collapses whitespace, then hands the cleaned text to an optional grammar
/// backend.
///
/// Text that is empty after cleaning is returned as-is without calling the
/// backend.
pub struct NormalizingCorrector {
    grammar: Option<Box<dyn TextCorrector>>,
}

impl NormalizingCorrector {
    /// Whitespace normalization only.
    pub fn new() -> Self {
        Self { grammar: None }
    }

    /// Normalize, then delegate to `grammar`.
    pub fn with_grammar(grammar: impl TextCorrector + 'static) -> Self {
        Self {
            grammar: Some(Box::new(grammar)),
        }
    }

    /// Build from config: LanguageTool is attached only when enabled.
    pub fn from_config(config: &CorrectionConfig) -> Self {
        if config.enabled {
            Self::with_grammar(LanguageToolCorrector::from_config(config))
        } else {
            Self::new()
        }
    }
}

impl Default for NormalizingCorrector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextCorrector for NormalizingCorrector {
    async fn correct(&self, ctx: &CallContext, text: &str) -> Result<String, CorrectionError> {
        let cleaned = normalize_whitespace(text);
        if cleaned.is_empty() {
            return Ok(cleaned);
        }

        match &self.grammar {
            Some(grammar) => grammar.correct(ctx, &cleaned).await,
            None => Ok(cleaned),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
