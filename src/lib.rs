pub mod actions;
pub mod audio;
pub mod commands;
pub mod config;
pub mod intent;
pub mod session;
pub mod speech;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum HarkError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Speech engine error: {0}")]
    SpeechEngineError(String),

    #[error("Action error: {0}")]
    ActionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl HarkError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            HarkError::AudioDeviceError(_) => false,
            // Recognizer errors on a single frame are typically transient
            HarkError::SpeechEngineError(_) => true,
            // A failed launch/open leaves the session intact
            HarkError::ActionError(_) => true,
            // Config errors require user intervention
            HarkError::ConfigError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            HarkError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
            HarkError::SpeechEngineError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            HarkError::ActionError(_) => {
                "Could not carry out the requested action.".to_string()
            }
            HarkError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HarkError>;
