//! WebView lifecycle management.
//!
//! `WebViewManager` creates the window's `wry::WebView` and collects the
//! events its handlers emit.

use std::sync::{Arc, Mutex};

use crate::events::WebViewEvent;

mod handle;
pub mod handlers;
mod lifecycle;
mod types;

pub use handle::WebViewHandle;
pub use types::WebViewConfig;

/// Owns the event sink shared with the WebView's handlers.
pub struct WebViewManager {
    /// Events pushed by the WebView handlers, drained by the event loop.
    pub(crate) events: Arc<Mutex<Vec<WebViewEvent>>>,
}

impl WebViewManager {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Default for WebViewManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_queue() {
        let manager = WebViewManager::new();
        manager
            .events
            .lock()
            .unwrap()
            .push(WebViewEvent::TitleChanged {
                title: "Demo".into(),
            });

        let drained = manager.drain_events();
        assert_eq!(
            drained,
            vec![WebViewEvent::TitleChanged {
                title: "Demo".into()
            }]
        );
        assert!(manager.drain_events().is_empty());
    }
}
