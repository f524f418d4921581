//! Wake-word session management
//!
//! This module is the heart of the assistant: the state machine that decides
//! when the assistant is asleep, when it is buffering a command, and when a
//! buffered utterance is finished, plus the listener thread that drives it
//! from the audio frame queue.

pub mod listener;
pub mod state;

pub use listener::Listener;
pub use state::{Phase, Session};
