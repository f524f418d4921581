//! Listener thread
//!
//! The single consumer of the audio frame queue. Each cycle either drains
//! one frame into the speech engine or, when the queue stays empty past the
//! poll interval, re-evaluates the session timers. Command resolution runs
//! inline on this thread; a slow classifier call simply delays the next
//! poll, it never races the session state.

use crate::commands::{CommandOutcome, CommandResolver};
use crate::config::AssistantConfig;
use crate::session::Session;
use crate::speech::SpeechEngine;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub struct Listener<E: SpeechEngine> {
    session: Session,
    engine: E,
    resolver: CommandResolver,
    frame_rx: Receiver<Vec<i16>>,
    poll_interval: Duration,
}

impl<E: SpeechEngine + Send + 'static> Listener<E> {
    pub fn new(
        config: &AssistantConfig,
        engine: E,
        resolver: CommandResolver,
        frame_rx: Receiver<Vec<i16>>,
    ) -> Self {
        Self {
            session: Session::new(config),
            engine,
            resolver,
            frame_rx,
            poll_interval: config.poll_interval,
        }
    }

    /// Start the listener on its own thread
    pub fn spawn(self) -> JoinHandle<()> {
        thread::spawn(move || self.run())
    }

    /// Drive the session until the frame queue disconnects
    pub fn run(mut self) {
        info!("Recognition started. Listening for wake word...");

        loop {
            match self.frame_rx.recv_timeout(self.poll_interval) {
                Ok(frame) => {
                    let now = Instant::now();
                    match self.engine.accept_frame(&frame) {
                        Ok(Some(fragment)) => {
                            if let Some(utterance) = self.session.on_fragment(&fragment, now) {
                                self.dispatch(&utterance);
                            }
                        }
                        Ok(None) => {}
                        Err(e) if e.is_recoverable() => {
                            warn!("Speech engine error, skipping frame: {}", e);
                        }
                        Err(e) => {
                            error!("Fatal speech engine error: {}", e);
                            break;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let now = Instant::now();
                    if let Some(utterance) = self.session.on_poll_timeout(now) {
                        self.dispatch(&utterance);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Audio queue closed. Listener stopping.");
                    break;
                }
            }
        }
    }

    fn dispatch(&mut self, utterance: &str) {
        let outcome = self.resolver.execute(utterance);
        if outcome == CommandOutcome::Unresolved {
            info!("Command not recognized: '{}'", utterance);
        }
        // The session clock restarts only once resolution (including any
        // classifier round-trip) has finished.
        self.session.finish_command(outcome, Instant::now());
    }
}
