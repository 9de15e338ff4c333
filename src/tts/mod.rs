//! Speech synthesis module.
//!
//! * [`Synthesizer`]: async trait for text → audio file.
//! * [`EdgeTtsSynthesizer`]: edge-tts CLI backend.
//! * [`VoiceProfile`], [`VOICES`], [`DEFAULT_VOICE`], [`resolve_voice`]:
//!   the fixed voice allow-list.
//!
//! Output is always MP3 ([`AUDIO_EXTENSION`]) regardless of the requested
//! file name.

pub mod edge;
pub mod synthesizer;
pub mod voice;

pub use edge::EdgeTtsSynthesizer;
pub use synthesizer::{audio_path_for, SynthesisRequest, Synthesizer, TtsError, AUDIO_EXTENSION};
pub use voice::{find_voice, resolve_voice, VoiceProfile, DEFAULT_VOICE, VOICES};

#[cfg(test)]
pub use synthesizer::MockSynthesizer;
