//! LanguageTool HTTP backend.
//!
//! Posts the text to `{base_url}/v2/check` and applies the first suggested
//! replacement of every match.  All connection details come from
//! [`CorrectionConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use serde::Deserialize;

use crate::call::CallContext;
use crate::config::CorrectionConfig;
use crate::correction::corrector::{CorrectionError, TextCorrector};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub matches: Vec<RuleMatch>,
}

/// One issue reported by LanguageTool.  `offset` and `length` count UTF-16
/// code units of the submitted text.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleMatch {
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

impl RuleMatch {
    /// End offset, or `None` if it overflows or lies past `len` units.
    fn end_within(&self, len: usize) -> Option<usize> {
        self.offset
            .checked_add(self.length)
            .filter(|end| *end <= len)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Replacement {
    pub value: String,
}

/// Apply the first replacement of every match to `text`.
///
/// Matches without replacements, out-of-range or overflowing matches, and
/// matches that overlap an earlier one are skipped.
pub fn apply_matches(text: &str, matches: &[RuleMatch]) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();

    let mut ordered: Vec<(&RuleMatch, usize)> = matches
        .iter()
        .filter(|m| !m.replacements.is_empty())
        .filter_map(|m| match m.end_within(units.len()) {
            Some(end) => Some((m, end)),
            None => {
                log::debug!(
                    "correction: skipping match at {}+{} outside {} units",
                    m.offset,
                    m.length,
                    units.len()
                );
                None
            }
        })
        .collect();
    ordered.sort_by_key(|(m, _)| m.offset);

    let mut out: Vec<u16> = Vec::with_capacity(units.len());
    let mut cursor = 0;
    for (m, end) in ordered {
        if m.offset < cursor {
            continue;
        }
        out.extend_from_slice(&units[cursor..m.offset]);
        out.extend(m.replacements[0].value.encode_utf16());
        cursor = end;
    }
    out.extend_from_slice(&units[cursor..]);
    String::from_utf16_lossy(&out)
}

// ---------------------------------------------------------------------------
// LanguageToolCorrector
// ---------------------------------------------------------------------------

pub struct LanguageToolCorrector {
    client: reqwest::Client,
    config: CorrectionConfig,
}

impl LanguageToolCorrector {
    /// Build from config.  The HTTP client carries the per-request timeout
    /// from `config.timeout_secs`; a default client is used if the builder
    /// fails.
    pub fn from_config(config: &CorrectionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl TextCorrector for LanguageToolCorrector {
    async fn correct(&self, ctx: &CallContext, text: &str) -> Result<String, CorrectionError> {
        let url = format!("{}/v2/check", self.config.base_url.trim_end_matches('/'));
        let form = [("text", text), ("language", self.config.language.as_str())];

        let request = self.client.post(&url).form(&form).send();
        let response = tokio::select! {
            res = request => res?,
            _ = ctx.cancel.cancelled() => {
                return Err(CorrectionError::Request("abandoned by caller".into()));
            }
        };

        let response = response.error_for_status()?;
        let body: CheckResponse = response
            .json()
            .await
            .map_err(|e| CorrectionError::Parse(e.to_string()))?;

        log::debug!("correction: {} LanguageTool matches", body.matches.len());
        Ok(apply_matches(text, &body.matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(offset: usize, length: usize, value: &str) -> RuleMatch {
        RuleMatch {
            offset,
            length,
            replacements: vec![Replacement {
                value: value.into(),
            }],
        }
    }

    #[test]
    fn applies_single_replacement() {
        assert_eq!(apply_matches("ola mundo", &[m(0, 3, "hola")]), "hola mundo");
    }

    #[test]
    fn applies_multiple_in_any_order() {
        let text = "ola mundo kruel";
        let matches = [m(10, 5, "cruel"), m(0, 3, "Hola")];
        assert_eq!(apply_matches(text, &matches), "Hola mundo cruel");
    }

    #[test]
    fn overflowing_match_is_skipped() {
        let matches = [m(usize::MAX, 2, "z"), m(0, 1, "A")];
        assert_eq!(apply_matches("abc", &matches), "Abc");
    }

    #[test]
    fn offsets_count_utf16_units() {
        // The emoji is two UTF-16 units; "ola" starts at unit 3.
        let text = "😀 ola mundo";
        assert_eq!(apply_matches(text, &[m(3, 3, "hola")]), "😀 hola mundo");
    }

    #[test]
    fn offsets_are_not_bytes() {
        // "año" has a two-byte ñ; the match targets "esta" after it.
        let text = "año esta";
        assert_eq!(apply_matches(text, &[m(4, 4, "está")]), "año está");
    }

    #[test]
    fn skips_overlapping_and_empty_matches() {
        let text = "abc def";
        let matches = [
            m(0, 3, "ABC"),
            m(1, 2, "XX"),
            RuleMatch {
                offset: 4,
                length: 3,
                replacements: vec![],
            },
        ];
        assert_eq!(apply_matches(text, &matches), "ABC def");
    }

    #[test]
    fn out_of_range_match_is_ignored() {
        assert_eq!(apply_matches("abc", &[m(2, 5, "z")]), "abc");
    }

    #[test]
    fn parses_check_response() {
        let json = r#"{"matches":[{"offset":0,"length":3,"replacements":[{"value":"Hola"}],"rule":{"id":"X"}}]}"#;
        let parsed: CheckResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.matches.len(), 1);
        assert_eq!(parsed.matches[0].replacements[0].value, "Hola");
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _ = LanguageToolCorrector::from_config(&CorrectionConfig::default());
    }

    #[tokio::test]
    async fn unreachable_server_is_request_error() {
        let cfg = CorrectionConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..CorrectionConfig::default()
        };
        let c = LanguageToolCorrector::from_config(&cfg);
        let err = c
            .correct(&CallContext::detached(), "hola")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CorrectionError::Request(_) | CorrectionError::Timeout
        ));
    }
}
