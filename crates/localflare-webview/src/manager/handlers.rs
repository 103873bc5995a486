use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::{PageLoadState, WebViewEvent};

use super::WebViewManager;

// =============================================================================
// NAVIGATION ALLOWLIST
// =============================================================================

/// Always reachable, regardless of the configured origins.
pub const ABOUT_BLANK: &str = "about:blank";

/// Check whether `url` stays inside one of `allowed_origins`.
///
/// An origin matches when the URL equals it or continues with a path,
/// query or fragment, so `http://127.0.0.1:9517` does not admit
/// `http://127.0.0.1:95170`.
pub fn is_navigation_allowed(url: &str, allowed_origins: &[String]) -> bool {
    if url == ABOUT_BLANK {
        return true;
    }
    allowed_origins.iter().any(|origin| {
        let origin = origin.trim_end_matches('/');
        match url.strip_prefix(origin) {
            Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
            None => false,
        }
    })
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

impl WebViewManager {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();

            if serde_json::from_str::<serde_json::Value>(&body).is_err() {
                warn!(body_len = body.len(), "IPC message rejected: invalid JSON");
                return;
            }

            debug!(body_len = body.len(), "IPC message from JS");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::IpcMessage { body });
            }
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(?state, url = %url, "page load");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::PageLoad { state, url });
            }
        })
    }

    pub(super) fn attach_title_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_document_title_changed_handler(move |title| {
            debug!(title = %title, "title changed");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::TitleChanged { title });
            }
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        allowed_origins: Vec<String>,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            let allowed = is_navigation_allowed(&url, &allowed_origins);
            if allowed {
                debug!(url = %url, "navigation allowed");
            } else {
                warn!(url = %url, "navigation blocked: URL outside the app origin");
            }
            if let Ok(mut evts) = events.lock() {
                evts.push(if allowed {
                    WebViewEvent::NavigationRequested { url }
                } else {
                    WebViewEvent::NavigationBlocked { url }
                });
            }
            allowed
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
