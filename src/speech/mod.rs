//! Speech recognition boundary
//!
//! The assistant treats the recognizer as a black box: PCM frames go in,
//! transcript fragments come out. `SpeechEngine` is the seam; the Vosk
//! implementation lives in `stt` behind the `vosk-stt` feature so the rest
//! of the crate builds and tests without the native library.

#[cfg(feature = "vosk-stt")]
pub mod stt;

#[cfg(feature = "vosk-stt")]
pub use stt::VoskEngine;

use crate::Result;

/// One transcript event from the speech engine.
///
/// Partial fragments are revisable and carry the whole utterance-so-far;
/// final fragments are the engine's confirmed transcript for a completed
/// utterance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptFragment {
    pub text: String,
    pub is_final: bool,
}

impl TranscriptFragment {
    /// An in-progress, revisable transcript of the current utterance
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    /// A confirmed, immutable transcript for a completed utterance
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Streaming speech recognizer boundary
///
/// Feed fixed-size 16-bit little-endian mono PCM frames; each call yields at
/// most one fragment. Implementations keep whatever internal decoder state
/// they need.
pub trait SpeechEngine {
    fn accept_frame(&mut self, frame: &[i16]) -> Result<Option<TranscriptFragment>>;
}
