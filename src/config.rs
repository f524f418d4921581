//! Configuration for the assistant
//!
//! Centralizes the listening parameters: wake-phrase aliases, audio capture
//! settings, and the session timers.

use std::path::PathBuf;
use std::time::Duration;

/// Wake-phrase aliases matched against transcripts.
///
/// The list mixes the canonical phrase with phonetic near-misses observed
/// from the recognizer. It is policy data: edit the config, not the session
/// machine, to tune wake behavior.
const DEFAULT_WAKE_ALIASES: &[&str] = &[
    "hey pc", "apc", "hey c", "hey d c", "hp c", "hey he", "hey please", "abc", "hey see",
];

/// Configuration for the complete assistant
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    /// Wake-phrase aliases, matched as substrings in priority order
    pub wake_aliases: Vec<String>,

    /// Capture sample rate in Hz
    pub sample_rate: u32,

    /// Samples per capture block (smaller blocks stream faster)
    pub block_size: u32,

    /// RMS energy below which a capture block is dropped as noise
    pub energy_threshold: f32,

    /// Silence after which a buffered command is considered finished
    pub silence_threshold: Duration,

    /// Inactivity after which the session returns to idle
    pub session_timeout: Duration,

    /// How long the listener waits on the frame queue per poll cycle
    pub poll_interval: Duration,

    /// Bounded capacity of the producer-to-listener frame queue
    pub frame_queue_capacity: usize,

    /// Path to the Vosk model directory
    pub model_path: PathBuf,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_aliases: DEFAULT_WAKE_ALIASES.iter().map(|s| s.to_string()).collect(),
            sample_rate: 16000,
            block_size: 4000,
            energy_threshold: 0.0,
            silence_threshold: Duration::from_millis(1200),
            session_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(100),
            frame_queue_capacity: 64,
            model_path: PathBuf::from("models/vosk"),
        }
    }
}

impl AssistantConfig {
    /// Create a configuration from the environment
    ///
    /// Honors `VOSK_MODEL_PATH` when set; everything else uses defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("VOSK_MODEL_PATH") {
            if !path.is_empty() {
                config.model_path = PathBuf::from(path);
            }
        }
        config
    }

    /// Set the wake-phrase aliases
    pub fn with_wake_aliases(mut self, aliases: Vec<String>) -> Self {
        self.wake_aliases = aliases;
        self
    }

    /// Set the session timers
    pub fn with_timers(mut self, silence_threshold: Duration, session_timeout: Duration) -> Self {
        self.silence_threshold = silence_threshold;
        self.session_timeout = session_timeout;
        self
    }

    /// Set the Vosk model path
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.wake_aliases.is_empty() {
            return Err("At least one wake alias is required".to_string());
        }

        if self.sample_rate == 0 || self.block_size == 0 {
            return Err("Sample rate and block size must be non-zero".to_string());
        }

        if self.silence_threshold >= self.session_timeout {
            return Err(format!(
                "Silence threshold ({:?}) must be shorter than the session timeout ({:?})",
                self.silence_threshold, self.session_timeout
            ));
        }

        if cfg!(feature = "vosk-stt") && !self.model_path.exists() {
            return Err(format!("Vosk model not found: {:?}", self.model_path));
        }

        Ok(())
    }
}
