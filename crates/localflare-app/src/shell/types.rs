//! Internal constants for the shell module.

use std::time::Duration;

/// How often to drain WebView events.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Prompt shown by the page when the user tries to close the window.
pub(super) const CLOSE_PROMPT: &str = "Are you sure you want to close this window?";
