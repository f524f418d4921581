//! Layered command resolution
//!
//! Resolution runs in strict precedence order: sleep phrases, explicit
//! search intents, exact phrase lookup, keyword scan, fuzzy similarity, and
//! only then the AI intent classifier. The first pathway that succeeds wins;
//! dispatch happens through the [`ActionRunner`] as part of resolution.

use crate::actions::ActionRunner;
use crate::commands::fuzzy::similarity_ratio;
use crate::intent::{ClassifierError, IntentClassifier, IntentKind};
use tracing::{debug, info, warn};

const YOUTUBE_URL: &str = "https://www.youtube.com";
const GMAIL_URL: &str = "https://mail.google.com";

/// Phrases that put the assistant back to sleep, matched as substrings
const SLEEP_PHRASES: &[&str] = &["go to sleep", "stop listening", "goodbye"];

/// Prefixes marking an explicit search intent
const SEARCH_PREFIXES: &[&str] = &["search for", "google"];

/// Minimum similarity for a fuzzy phrase match
const FUZZY_THRESHOLD: f64 = 0.5;

/// An executable target resolved from a command phrase
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandTarget {
    /// A launchable system application identifier
    SystemApp(String),
    /// A URL to open in the default browser
    WebUrl(String),
    /// The typed sleep signal
    Sleep,
}

impl CommandTarget {
    fn app(identifier: &str) -> Self {
        CommandTarget::SystemApp(identifier.to_string())
    }

    fn url(url: &str) -> Self {
        CommandTarget::WebUrl(url.to_string())
    }
}

/// What resolving an utterance amounted to, reported back to the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A sleep phrase; the session should return to idle
    Sleep,
    /// An action was dispatched (or deliberately skipped)
    Handled,
    /// No pathway produced an action
    Unresolved,
}

/// Resolves free-text commands and dispatches the resulting actions
pub struct CommandResolver {
    phrase_table: Vec<(&'static str, CommandTarget)>,
    actions: Box<dyn ActionRunner>,
    classifier: Box<dyn IntentClassifier>,
}

impl CommandResolver {
    pub fn new(actions: Box<dyn ActionRunner>, classifier: Box<dyn IntentClassifier>) -> Self {
        let phrase_table = vec![
            ("open chrome", CommandTarget::app("chrome")),
            ("open notepad", CommandTarget::app("notepad")),
            ("open calculator", CommandTarget::app("calc")),
            ("open editor", CommandTarget::app("notepad")),
            ("open browser", CommandTarget::app("chrome")),
            ("open youtube", CommandTarget::url(YOUTUBE_URL)),
            ("open inbox", CommandTarget::url(GMAIL_URL)),
            ("whats in my inbox", CommandTarget::url(GMAIL_URL)),
            ("check email", CommandTarget::url(GMAIL_URL)),
            ("go to sleep", CommandTarget::Sleep),
            ("stop listening", CommandTarget::Sleep),
            ("goodbye", CommandTarget::Sleep),
        ];

        Self {
            phrase_table,
            actions,
            classifier,
        }
    }

    /// Resolve a command and dispatch whatever action it maps to
    pub fn execute(&self, command: &str) -> CommandOutcome {
        let command = command.to_lowercase();
        let command = command.trim();
        if command.is_empty() {
            return CommandOutcome::Unresolved;
        }

        info!("Processing command: '{}'", command);

        if SLEEP_PHRASES.iter().any(|phrase| command.contains(phrase)) {
            info!("Assistant going to sleep. Say the wake word to wake me.");
            return CommandOutcome::Sleep;
        }

        if let Some(query) = strip_search_prefix(command) {
            if query.is_empty() {
                debug!("Search intent with an empty query; nothing to do");
            } else if let Err(e) = self.actions.web_search(&query) {
                warn!("Web search failed: {}", e);
            }
            return CommandOutcome::Handled;
        }

        if let Some(target) = self.resolve_local(command) {
            return self.dispatch(&target);
        }

        info!("No direct/fuzzy match found. Consulting intent classifier...");
        self.consult_classifier(command)
    }

    /// Local matching: exact phrase, then keyword, then fuzzy similarity
    fn resolve_local(&self, command: &str) -> Option<CommandTarget> {
        if let Some(target) = self.exact_target(command) {
            return Some(target);
        }
        if let Some(target) = keyword_target(command) {
            return Some(target);
        }
        self.fuzzy_target(command)
    }

    fn exact_target(&self, command: &str) -> Option<CommandTarget> {
        self.phrase_table
            .iter()
            .find(|(phrase, _)| *phrase == command)
            .map(|(_, target)| target.clone())
    }

    fn fuzzy_target(&self, command: &str) -> Option<CommandTarget> {
        let (best_phrase, best_target, best_score) = self
            .phrase_table
            .iter()
            .map(|(phrase, target)| (*phrase, target, similarity_ratio(command, phrase)))
            .max_by(|a, b| a.2.total_cmp(&b.2))?;

        if best_score < FUZZY_THRESHOLD {
            return None;
        }

        info!(
            "Fuzzy matched '{}' to '{}' ({:.2})",
            command, best_phrase, best_score
        );
        Some(best_target.clone())
    }

    fn dispatch(&self, target: &CommandTarget) -> CommandOutcome {
        match target {
            CommandTarget::SystemApp(identifier) => {
                if let Err(e) = self.actions.launch_app(identifier) {
                    warn!("Failed to launch '{}': {}", identifier, e);
                }
                CommandOutcome::Handled
            }
            CommandTarget::WebUrl(url) => {
                if let Err(e) = self.actions.open_url(url) {
                    warn!("Failed to open '{}': {}", url, e);
                }
                CommandOutcome::Handled
            }
            CommandTarget::Sleep => CommandOutcome::Sleep,
        }
    }

    fn consult_classifier(&self, command: &str) -> CommandOutcome {
        let intent = match self.classifier.classify(command) {
            Ok(intent) => intent,
            Err(ClassifierError::MissingCredentials) => {
                warn!("Intent classifier is not configured.");
                warn!("Please set your GEMINI_API_KEY environment variable.");
                return CommandOutcome::Unresolved;
            }
            Err(e) => {
                warn!("Intent classifier failed: {}", e);
                return CommandOutcome::Unresolved;
            }
        };

        match intent.kind {
            IntentKind::OpenApp => {
                let suggestion = intent.target.to_lowercase();
                let suggestion = suggestion.trim();
                if suggestion.is_empty() {
                    return CommandOutcome::Unresolved;
                }

                info!("Classifier suggests opening app: {}", suggestion);
                if let Some(target) = self.known_target(suggestion) {
                    return self.dispatch(&target);
                }

                // Not in the table (e.g. "spotify"): attempt a direct launch
                // and swallow the failure.
                if let Err(e) = self.actions.launch_app(suggestion) {
                    warn!("Could not open suggested app '{}': {}", suggestion, e);
                }
                CommandOutcome::Handled
            }
            IntentKind::Search => {
                let query = intent.target.trim();
                if query.is_empty() {
                    return CommandOutcome::Unresolved;
                }
                info!("Classifier suggests web search: {}", query);
                if let Err(e) = self.actions.web_search(query) {
                    warn!("Web search failed: {}", e);
                }
                CommandOutcome::Handled
            }
            IntentKind::Error => {
                warn!("Classifier error: {}", intent.target);
                CommandOutcome::Unresolved
            }
            IntentKind::Unknown => {
                info!("Command not recognized by resolver or classifier.");
                CommandOutcome::Unresolved
            }
        }
    }

    /// Map a classifier suggestion onto a known target, by exact phrase or
    /// by keyword
    fn known_target(&self, suggestion: &str) -> Option<CommandTarget> {
        self.exact_target(suggestion)
            .or_else(|| keyword_target(suggestion))
    }
}

/// Keyword scan in fixed priority order
fn keyword_target(text: &str) -> Option<CommandTarget> {
    if text.contains("chrome") {
        Some(CommandTarget::app("chrome"))
    } else if text.contains("notepad") {
        Some(CommandTarget::app("notepad"))
    } else if text.contains("calculator") {
        Some(CommandTarget::app("calc"))
    } else if text.contains("youtube") {
        Some(CommandTarget::url(YOUTUBE_URL))
    } else if text.contains("inbox") || text.contains("email") {
        Some(CommandTarget::url(GMAIL_URL))
    } else {
        None
    }
}

/// Strip an explicit search prefix, returning the trimmed query
fn strip_search_prefix(command: &str) -> Option<String> {
    SEARCH_PREFIXES
        .iter()
        .find_map(|prefix| command.strip_prefix(prefix))
        .map(|query| query.trim().to_string())
}
