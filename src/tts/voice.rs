//! Voice registry and resolution.
//!
//! [`VOICES`] is the fixed allow-list of synthesis voices.  Requests for any
//! other identifier are remapped to [`DEFAULT_VOICE`] by [`resolve_voice`];
//! an unknown voice is never an error.

use std::fmt;

// ---------------------------------------------------------------------------
// VoiceProfile
// ---------------------------------------------------------------------------

/// Static metadata for one synthesis voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceProfile {
    /// Identifier passed to the synthesizer (e.g. `"es-MX-JorgeNeural"`).
    pub id: &'static str,
    /// BCP-47 locale the voice speaks.
    pub locale: &'static str,
}

impl fmt::Display for VoiceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

// ---------------------------------------------------------------------------
// Allow-list
// ---------------------------------------------------------------------------

/// The only voices the synthesizer is ever asked for.
pub const VOICES: &[VoiceProfile] = &[
    VoiceProfile {
        id: "es-ES-AlvaroNeural",
        locale: "es-ES",
    },
    VoiceProfile {
        id: "es-ES-ElviraNeural",
        locale: "es-ES",
    },
    VoiceProfile {
        id: "es-MX-DaliaNeural",
        locale: "es-MX",
    },
    VoiceProfile {
        id: "es-MX-JorgeNeural",
        locale: "es-MX",
    },
];

/// Canonical fallback for unknown or missing voice identifiers.
pub const DEFAULT_VOICE: VoiceProfile = VoiceProfile {
    id: "es-MX-JorgeNeural",
    locale: "es-MX",
};

/// Look up a voice by exact identifier.
pub fn find_voice(id: &str) -> Option<VoiceProfile> {
    VOICES.iter().copied().find(|v| v.id == id)
}

/// Resolve a requested identifier against the allow-list.
///
/// ```
/// use ocr_to_voice::tts::{resolve_voice, DEFAULT_VOICE};
///
/// assert_eq!(resolve_voice(Some("es-ES-ElviraNeural")).id, "es-ES-ElviraNeural");
/// assert_eq!(resolve_voice(Some("xx-YY-Ghost")), DEFAULT_VOICE);
/// assert_eq!(resolve_voice(None), DEFAULT_VOICE);
/// ```
pub fn resolve_voice(requested: Option<&str>) -> VoiceProfile {
    match requested {
        None => DEFAULT_VOICE,
        Some(id) => find_voice(id).unwrap_or_else(|| {
            log::debug!("tts: voice {id:?} not in allow-list, using {DEFAULT_VOICE}");
            DEFAULT_VOICE
        }),
    }
}
