//! FlareShell struct definition and constructor.

use std::time::Instant;

use winit::window::Window;

use localflare_bridge::ServerHandle;
use localflare_common::ShellError;
use localflare_config::AppConfig;
use localflare_webview::{WebViewHandle, WebViewManager};

/// Window-side application state.
pub(crate) struct FlareShell {
    pub(super) config: AppConfig,
    pub(super) server: ServerHandle,

    // Dropped before the window that hosts it.
    pub(super) webview: Option<WebViewHandle>,
    pub(super) window: Option<Window>,
    pub(super) webview_events: WebViewManager,

    pub(super) last_poll: Instant,
    pub(super) should_exit: bool,
    /// Set once the server thread is seen stopped.
    pub(super) server_stopped: bool,
    /// First fatal error, reported by `shell::run` after the loop exits.
    pub(crate) failure: Option<ShellError>,
}

impl FlareShell {
    pub(crate) fn new(config: AppConfig, server: ServerHandle) -> Self {
        Self {
            config,
            server,
            webview: None,
            window: None,
            webview_events: WebViewManager::new(),
            last_poll: Instant::now(),
            should_exit: false,
            server_stopped: false,
            failure: None,
        }
    }
}
