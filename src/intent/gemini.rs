//! Gemini-backed intent classification
//!
//! Calls the `generateContent` endpoint with a prompt that asks for a strict
//! JSON intent object. The model sometimes wraps its reply in a Markdown
//! code fence, so the reply is unfenced before parsing.

use crate::intent::{ClassifierError, Intent, IntentClassifier};
use crate::{HarkError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-flash-latest";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GeminiClassifier {
    api_key: Option<String>,
    model: String,
    client: reqwest::blocking::Client,
}

impl GeminiClassifier {
    /// Build from the environment
    ///
    /// Reads `GEMINI_API_KEY`; an absent key still yields a classifier, one
    /// that reports `MissingCredentials` when consulted.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::build(api_key)
    }

    /// Create with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::build(Some(api_key.into()))
    }

    fn build(api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HarkError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            client,
        })
    }

    /// Check whether a credential is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }
}

impl IntentClassifier for GeminiClassifier {
    fn classify(&self, text: &str) -> std::result::Result<Intent, ClassifierError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ClassifierError::MissingCredentials)?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(text) }] }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| ClassifierError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        let reply: GenerateContentResponse = response
            .json()
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        let content = reply
            .first_text()
            .ok_or_else(|| ClassifierError::Parse("response carried no text part".to_string()))?;

        debug!("Classifier reply: {}", content);
        parse_intent(&content)
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        r#"You are a voice assistant intent parser.
The following text comes from a speech recognizer and might have phonetic errors.

User Spoke: "{text}"

Tasks:
1. Correct phonetic errors (e.g., "hoping you tube" -> "open youtube").
2. Identify the intent:
   - OPEN_APP: If user wants to open a platform (youtube, gmail, chrome, etc) or app (notepad, calc).
   - SEARCH: If user is asking a question or wants to search something (e.g., "whats trending in tech").
   - UNKNOWN: If you can't satisfy the request.

Return ONLY a valid JSON object. No extra text.
Example 1: {{"type": "OPEN_APP", "target": "youtube"}}
Example 2: {{"type": "SEARCH", "target": "latest tech trends 2024"}}
Example 3: {{"type": "OPEN_APP", "target": "notepad"}}"#
    )
}

/// Parse the model's JSON reply into an intent
fn parse_intent(content: &str) -> std::result::Result<Intent, ClassifierError> {
    let cleaned = strip_code_fence(content);

    let raw: RawIntent =
        serde_json::from_str(cleaned).map_err(|e| ClassifierError::Parse(e.to_string()))?;

    Ok(match raw.kind.as_str() {
        "OPEN_APP" => Intent::open_app(raw.target),
        "SEARCH" => Intent::search(raw.target),
        "ERROR" => Intent::error(raw.target),
        _ => Intent::unknown(),
    })
}

/// Remove a surrounding ```json / ``` fence, if present
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[derive(Deserialize)]
struct RawIntent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    target: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .parts
            .first()
            .map(|part| part.text.clone())
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentKind;

    #[test]
    fn test_missing_key_reports_missing_credentials() {
        let classifier = GeminiClassifier::build(None).unwrap();
        assert!(!classifier.is_configured());

        let err = classifier.classify("open spotify").unwrap_err();
        assert!(matches!(err, ClassifierError::MissingCredentials));
    }

    #[test]
    fn test_parse_plain_intent() {
        let intent = parse_intent(r#"{"type": "OPEN_APP", "target": "youtube"}"#).unwrap();
        assert_eq!(intent.kind, IntentKind::OpenApp);
        assert_eq!(intent.target, "youtube");
    }

    #[test]
    fn test_parse_fenced_intent() {
        let content = "```json\n{\"type\": \"SEARCH\", \"target\": \"tech trends\"}\n```";
        let intent = parse_intent(content).unwrap();
        assert_eq!(intent.kind, IntentKind::Search);
        assert_eq!(intent.target, "tech trends");
    }

    #[test]
    fn test_parse_unknown_kind() {
        let intent = parse_intent(r#"{"type": "SOMETHING_ELSE", "target": "x"}"#).unwrap();
        assert_eq!(intent.kind, IntentKind::Unknown);
    }

    #[test]
    fn test_parse_missing_target_defaults_empty() {
        let intent = parse_intent(r#"{"type": "OPEN_APP"}"#).unwrap();
        assert_eq!(intent.kind, IntentKind::OpenApp);
        assert!(intent.target.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(matches!(
            parse_intent("sorry, I cannot help with that"),
            Err(ClassifierError::Parse(_))
        ));
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_first_text_extraction() {
        let reply: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"type\":\"UNKNOWN\"}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.first_text().as_deref(), Some("{\"type\":\"UNKNOWN\"}"));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(empty.first_text().is_none());
    }
}
