//! Action executors
//!
//! The side-effect boundary: launching applications, opening URLs, and
//! running web searches. `ActionRunner` is the seam the resolver dispatches
//! through, so tests can record actions instead of touching the desktop.

use crate::{HarkError, Result};
use tracing::info;

/// Dispatch boundary for resolved commands
pub trait ActionRunner: Send {
    /// Launch a system application by identifier, best-effort
    fn launch_app(&self, identifier: &str) -> Result<()>;

    /// Open a URL in the default browser
    fn open_url(&self, url: &str) -> Result<()>;

    /// Search the web for a query
    fn web_search(&self, query: &str) -> Result<()> {
        self.open_url(&search_url(query))
    }
}

/// Build a search-engine URL for a query, percent-encoded
pub fn search_url(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(query)
    )
}

/// Production executor backed by the OS
pub struct DesktopActions;

impl ActionRunner for DesktopActions {
    fn launch_app(&self, identifier: &str) -> Result<()> {
        info!("Opening System App: {}", identifier);
        std::process::Command::new(identifier)
            .spawn()
            .map(|_| ())
            .map_err(|e| {
                HarkError::ActionError(format!("Failed to launch '{}': {}", identifier, e))
            })
    }

    fn open_url(&self, url: &str) -> Result<()> {
        info!("Opening URL: {}", url);
        webbrowser::open(url)
            .map_err(|e| HarkError::ActionError(format!("Failed to open '{}': {}", url, e)))
    }
}
