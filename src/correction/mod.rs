//! Text correction module.
//!
//! This module provides:
//! * [`TextCorrector`]: async trait implemented by all corrector backends.
//! * [`NormalizingCorrector`]: collapses whitespace, then optionally
//!   delegates to a grammar backend.
//! * [`LanguageToolCorrector`]: LanguageTool HTTP `/v2/check` backend.
//! * [`CorrectionError`]: error variants for correction.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ocr_to_voice::call::CallContext;
//! use ocr_to_voice::config::AppConfig;
//! use ocr_to_voice::correction::{NormalizingCorrector, TextCorrector};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let corrector = NormalizingCorrector::from_config(&config.correction);
//!
//!     let fixed = corrector
//!         .correct(&CallContext::detached(), "  ola   mundo \n")
//!         .await
//!         .unwrap();
//!     println!("{fixed}");
//! }
//! ```

pub mod corrector;
pub mod languagetool;
pub mod normalize;

pub use corrector::{CorrectionError, NormalizingCorrector, TextCorrector};
pub use languagetool::LanguageToolCorrector;
pub use normalize::normalize_whitespace;
