//! WebView event types.

use serde::{Deserialize, Serialize};

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by the WebView, drained by the window event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WebViewEvent {
    /// Page load state changed. Carries the URL.
    PageLoad { state: PageLoadState, url: String },
    /// Document title changed.
    TitleChanged { title: String },
    /// A JSON IPC message was received from JavaScript.
    IpcMessage { body: String },
    /// An allowed navigation is about to happen.
    NavigationRequested { url: String },
    /// A navigation outside the allowlist was refused.
    NavigationBlocked { url: String },
}
