//! Vosk-backed speech recognition
//!
//! Wraps a streaming Vosk recognizer as a `SpeechEngine`. Finalized decoder
//! results become final fragments; everything else surfaces as the current
//! partial transcript.

use crate::config::AssistantConfig;
use crate::speech::{SpeechEngine, TranscriptFragment};
use crate::{HarkError, Result};
use tracing::{debug, info};
use vosk::{DecodingState, Model, Recognizer};

pub struct VoskEngine {
    recognizer: Recognizer,
    /// Last partial emitted, so repeated identical partials are suppressed
    last_partial: String,
}

impl VoskEngine {
    /// Load the model and create a streaming recognizer
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let model_path = config.model_path.to_string_lossy();
        info!("Loading Vosk model from {}", model_path);

        let model = Model::new(model_path.as_ref()).ok_or_else(|| {
            HarkError::SpeechEngineError(format!("Failed to load Vosk model at {:?}", config.model_path))
        })?;

        let mut recognizer =
            Recognizer::new(&model, config.sample_rate as f32).ok_or_else(|| {
                HarkError::SpeechEngineError("Failed to create Vosk recognizer".to_string())
            })?;
        recognizer.set_words(false);

        Ok(Self {
            recognizer,
            last_partial: String::new(),
        })
    }
}

impl SpeechEngine for VoskEngine {
    fn accept_frame(&mut self, frame: &[i16]) -> Result<Option<TranscriptFragment>> {
        match self.recognizer.accept_waveform(frame) {
            DecodingState::Finalized => {
                self.last_partial.clear();
                let text = self
                    .recognizer
                    .result()
                    .single()
                    .map(|r| r.text.to_string())
                    .unwrap_or_default();
                if text.is_empty() {
                    return Ok(None);
                }
                debug!("Final result: {}", text);
                Ok(Some(TranscriptFragment::final_text(text)))
            }
            DecodingState::Running => {
                let partial = self.recognizer.partial_result().partial.to_string();
                if partial.is_empty() || partial == self.last_partial {
                    return Ok(None);
                }
                debug!("Heard: {}", partial);
                self.last_partial = partial.clone();
                Ok(Some(TranscriptFragment::partial(partial)))
            }
            DecodingState::Failed => Err(HarkError::SpeechEngineError(
                "Recognizer failed to decode frame".to_string(),
            )),
        }
    }
}
