//! End-to-end listener tests
//!
//! These tests drive the full consumer pipeline (frame queue, speech
//! engine, session state machine, command resolution) with a scripted
//! engine and a recording action sink in place of the real boundaries.

use crossbeam_channel::bounded;
use hark::actions::ActionRunner;
use hark::commands::CommandResolver;
use hark::config::AssistantConfig;
use hark::intent::{ClassifierError, Intent, IntentClassifier};
use hark::session::Listener;
use hark::speech::{SpeechEngine, TranscriptFragment};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Speech engine that replays one scripted fragment per frame
struct ScriptedEngine {
    script: VecDeque<TranscriptFragment>,
}

impl ScriptedEngine {
    fn new(fragments: Vec<TranscriptFragment>) -> Self {
        Self {
            script: fragments.into(),
        }
    }
}

impl SpeechEngine for ScriptedEngine {
    fn accept_frame(&mut self, _frame: &[i16]) -> hark::Result<Option<TranscriptFragment>> {
        Ok(self.script.pop_front())
    }
}

/// Records dispatched actions in order instead of touching the desktop
#[derive(Clone, Default)]
struct RecordingActions {
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingActions {
    fn dispatched(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

impl ActionRunner for RecordingActions {
    fn launch_app(&self, identifier: &str) -> hark::Result<()> {
        self.log.lock().push(format!("app:{}", identifier));
        Ok(())
    }

    fn open_url(&self, url: &str) -> hark::Result<()> {
        self.log.lock().push(format!("url:{}", url));
        Ok(())
    }

    fn web_search(&self, query: &str) -> hark::Result<()> {
        self.log.lock().push(format!("search:{}", query));
        Ok(())
    }
}

/// Classifier behaving like an unconfigured run: credential missing
struct UnconfiguredClassifier;

impl IntentClassifier for UnconfiguredClassifier {
    fn classify(&self, _text: &str) -> Result<Intent, ClassifierError> {
        Err(ClassifierError::MissingCredentials)
    }
}

/// Feed one dummy frame per scripted fragment, keep the (silent) queue open
/// for `settle` so poll-timeout cycles can run, then disconnect and join.
fn run_script_with_settle(
    config: &AssistantConfig,
    fragments: Vec<TranscriptFragment>,
    settle: Duration,
) -> Vec<String> {
    let frame_count = fragments.len();

    let actions = RecordingActions::default();
    let resolver =
        CommandResolver::new(Box::new(actions.clone()), Box::new(UnconfiguredClassifier));
    let engine = ScriptedEngine::new(fragments);

    let (frame_tx, frame_rx) = bounded::<Vec<i16>>(config.frame_queue_capacity);
    let listener = Listener::new(config, engine, resolver, frame_rx);
    let handle = listener.spawn();

    for _ in 0..frame_count {
        frame_tx
            .send(vec![0i16; 160])
            .expect("listener hung up before the script finished");
    }

    if !settle.is_zero() {
        std::thread::sleep(settle);
    }

    drop(frame_tx);
    handle.join().expect("listener thread panicked");

    actions.dispatched()
}

fn run_script(config: &AssistantConfig, fragments: Vec<TranscriptFragment>) -> Vec<String> {
    run_script_with_settle(config, fragments, Duration::ZERO)
}

#[test]
fn test_wake_then_final_command_launches_app() {
    let config = AssistantConfig::default();

    let dispatched = run_script(
        &config,
        vec![
            TranscriptFragment::partial("hey pc open chrome"),
            TranscriptFragment::final_text("open chrome"),
        ],
    );

    assert_eq!(
        dispatched,
        vec!["app:chrome"],
        "A final fragment while active should resolve and launch exactly once"
    );
}

#[test]
fn test_search_command_dispatches_query() {
    let config = AssistantConfig::default();

    let dispatched = run_script(
        &config,
        vec![
            TranscriptFragment::partial("hey pc"),
            TranscriptFragment::final_text("search for rust programming"),
        ],
    );

    assert_eq!(dispatched, vec!["search:rust programming"]);
}

#[test]
fn test_sleep_command_ends_the_session() {
    let config = AssistantConfig::default();

    let dispatched = run_script(
        &config,
        vec![
            TranscriptFragment::partial("hey pc"),
            TranscriptFragment::final_text("go to sleep"),
            // Asleep again: a commanding final without the wake phrase
            // must be ignored.
            TranscriptFragment::final_text("open notepad"),
        ],
    );

    assert!(
        dispatched.is_empty(),
        "Nothing should be dispatched after the session goes to sleep, got {:?}",
        dispatched
    );
}

#[test]
fn test_unresolved_command_keeps_the_session_listening() {
    let config = AssistantConfig::default();

    let dispatched = run_script(
        &config,
        vec![
            TranscriptFragment::partial("hey pc"),
            // Misses every local pathway; the classifier has no credential
            TranscriptFragment::final_text("open spootify"),
            // The session must still be live for the next command
            TranscriptFragment::final_text("open chrome"),
        ],
    );

    assert_eq!(dispatched, vec!["app:chrome"]);
}

#[test]
fn test_silence_finalizes_the_buffered_command() {
    let config = AssistantConfig::default()
        .with_timers(Duration::from_millis(50), Duration::from_secs(10));

    let dispatched = run_script_with_settle(
        &config,
        vec![TranscriptFragment::partial("hey pc open notepad")],
        Duration::from_millis(500),
    );

    assert_eq!(
        dispatched,
        vec!["app:notepad"],
        "Going quiet after a buffered partial should finalize the command"
    );
}

#[test]
fn test_session_timeout_discards_the_buffer() {
    // Session expires before the silence threshold can ever finalize
    let config = AssistantConfig::default()
        .with_timers(Duration::from_secs(5), Duration::from_millis(60));

    let dispatched = run_script_with_settle(
        &config,
        vec![TranscriptFragment::partial("hey pc open notepad")],
        Duration::from_millis(500),
    );

    assert!(
        dispatched.is_empty(),
        "A session timeout must discard the buffer, got {:?}",
        dispatched
    );
}
