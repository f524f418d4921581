//! AI intent classification boundary
//!
//! Last-resort fallback for commands no local pathway could resolve: the raw
//! text goes to a cloud model that corrects phonetic errors and names an
//! intent. The classifier is a black box behind [`IntentClassifier`]; the
//! Gemini implementation lives in `gemini`.

pub mod gemini;

pub use gemini::GeminiClassifier;

use thiserror::Error;

/// What the classifier decided the user wanted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentKind {
    /// Open a platform or application
    OpenApp,
    /// Run a web search
    Search,
    /// The classifier itself reported an error
    Error,
    /// The classifier could not satisfy the request
    Unknown,
}

/// A structured intent produced by the classifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intent {
    pub kind: IntentKind,
    /// App identifier, search query, or error detail depending on the kind
    pub target: String,
}

impl Intent {
    pub fn open_app(target: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::OpenApp,
            target: target.into(),
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::Search,
            target: query.into(),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::Error,
            target: detail.into(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            kind: IntentKind::Unknown,
            target: String::new(),
        }
    }
}

/// Classifier call failures
///
/// A missing credential is its own kind so the resolver can point the user
/// at configuration instead of reporting a generic failure.
#[derive(Error, Debug, Clone)]
pub enum ClassifierError {
    #[error("API key not set")]
    MissingCredentials,

    #[error("Classifier request failed: {0}")]
    Request(String),

    #[error("Classifier returned a malformed intent: {0}")]
    Parse(String),
}

/// Text-to-intent boundary, consulted only after local matching fails
pub trait IntentClassifier: Send {
    fn classify(&self, text: &str) -> Result<Intent, ClassifierError>;
}
