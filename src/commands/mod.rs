//! Command resolution
//!
//! Maps free-text command utterances to executable targets through a layered
//! matching strategy: exact phrase, keyword, fuzzy similarity, and finally
//! the AI intent classifier. First successful pathway wins.

pub mod fuzzy;
pub mod resolver;

pub use resolver::{CommandOutcome, CommandResolver, CommandTarget};
