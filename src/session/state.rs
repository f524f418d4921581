//! Wake-word/command session state machine
//!
//! Consumes transcript fragments from the speech engine and decides when the
//! assistant wakes, what ends up in the command buffer, and when a buffered
//! utterance is finished. Timer checks run once per poll cycle; all methods
//! take an explicit `now` so transitions are deterministic under test.
//!
//! The machine itself performs no side effects. When an utterance is ready
//! it is handed back to the caller for resolution, and the resolver's
//! outcome is fed back through [`Session::finish_command`].

use crate::commands::CommandOutcome;
use crate::config::AssistantConfig;
use crate::speech::TranscriptFragment;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Listening phase of the single assistant session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Asleep; transcripts are only scanned for the wake phrase
    Idle,
    /// Woken with an empty command buffer
    AwaitingCommand,
    /// Woken and accumulating a command utterance
    Buffering,
}

/// The one live listening session
///
/// Exactly one instance exists per run, owned by the listener thread.
/// Inactive implies an empty command buffer.
pub struct Session {
    phase: Phase,
    buffer: String,
    session_start: Instant,
    last_speech: Instant,
    wake_aliases: Vec<String>,
    silence_threshold: Duration,
    session_timeout: Duration,
}

impl Session {
    pub fn new(config: &AssistantConfig) -> Self {
        let now = Instant::now();
        Self {
            phase: Phase::Idle,
            buffer: String::new(),
            session_start: now,
            last_speech: now,
            wake_aliases: config
                .wake_aliases
                .iter()
                .map(|a| a.to_lowercase().trim().to_string())
                .collect(),
            silence_threshold: config.silence_threshold,
            session_timeout: config.session_timeout,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Process one transcript fragment
    ///
    /// Returns an utterance to resolve when a final fragment arrives while
    /// the session is active. Empty fragments are ignored.
    pub fn on_fragment(
        &mut self,
        fragment: &TranscriptFragment,
        now: Instant,
    ) -> Option<String> {
        let text = fragment.text.to_lowercase().trim().to_string();
        if text.is_empty() {
            return None;
        }

        match self.phase {
            Phase::Idle => {
                self.try_wake(&text, now);
                None
            }
            Phase::AwaitingCommand | Phase::Buffering => {
                if fragment.is_final {
                    // Finals carry the whole confirmed utterance; resolve it
                    // directly, bypassing the buffer.
                    debug!("Final result received: {}", text);
                    Some(text)
                } else {
                    self.last_speech = now;
                    // Each partial carries the utterance-so-far, so the
                    // buffer is replaced, not appended to.
                    self.buffer = self.strip_all_aliases(&text);
                    self.phase = if self.buffer.is_empty() {
                        Phase::AwaitingCommand
                    } else {
                        Phase::Buffering
                    };
                    None
                }
            }
        }
    }

    /// Re-evaluate the session timers after a poll cycle with no fragment
    ///
    /// Returns the buffered command when silence has finished it. A session
    /// timeout wins over silence finalization when both are due.
    pub fn on_poll_timeout(&mut self, now: Instant) -> Option<String> {
        if self.phase == Phase::Idle {
            return None;
        }

        if now.duration_since(self.session_start) >= self.session_timeout {
            info!("Session timed out. Returning to idle...");
            self.go_idle();
            return None;
        }

        if now.duration_since(self.last_speech) >= self.silence_threshold
            && !self.buffer.trim().is_empty()
        {
            let command = self.buffer.trim().to_string();
            debug!("Processing command from buffer: {}", command);
            return Some(command);
        }

        None
    }

    /// Feed back the outcome of a dispatched utterance
    ///
    /// A sleep outcome ends the session; anything else keeps it live for the
    /// next command with a cleared buffer and a fresh session clock.
    pub fn finish_command(&mut self, outcome: CommandOutcome, now: Instant) {
        match outcome {
            CommandOutcome::Sleep => {
                info!("Returning to idle...");
                self.go_idle();
            }
            CommandOutcome::Handled | CommandOutcome::Unresolved => {
                debug!("Command processed. Still listening...");
                self.buffer.clear();
                self.phase = Phase::AwaitingCommand;
                self.session_start = now;
            }
        }
    }

    fn go_idle(&mut self) {
        self.phase = Phase::Idle;
        self.buffer.clear();
    }

    /// Wake on the first alias (in configured order) found anywhere in the
    /// fragment; any text left after stripping it becomes the initial buffer.
    fn try_wake(&mut self, text: &str, now: Instant) {
        let Some(alias) = self
            .wake_aliases
            .iter()
            .find(|alias| text.contains(alias.as_str()))
            .cloned()
        else {
            return;
        };

        let remainder = text.replacen(alias.as_str(), "", 1).trim().to_string();
        self.session_start = now;
        self.last_speech = now;

        if remainder.is_empty() {
            info!("Wake word detected. Listening for command...");
            self.buffer.clear();
            self.phase = Phase::AwaitingCommand;
        } else {
            info!("Command included with wake word: {}", remainder);
            self.buffer = remainder;
            self.phase = Phase::Buffering;
        }
    }

    fn strip_all_aliases(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for alias in &self.wake_aliases {
            cleaned = cleaned.replace(alias.as_str(), "");
        }
        cleaned.trim().to_string()
    }
}
