use std::sync::Arc;

use tracing::debug;
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::ipc::{IPC_INIT_SCRIPT, NO_TEXT_SELECT_SCRIPT};

use super::handle::WebViewHandle;
use super::types::WebViewConfig;
use super::WebViewManager;

impl WebViewManager {
    /// Create the WebView filling the given window.
    ///
    /// The `window` must implement `raw_window_handle::HasWindowHandle`.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        config: WebViewConfig,
    ) -> Result<WebViewHandle, wry::Error> {
        let events = Arc::clone(&self.events);

        let mut builder = WebViewBuilder::new()
            .with_url(&config.url)
            .with_devtools(config.devtools)
            .with_initialization_script(IPC_INIT_SCRIPT);

        if !config.text_select {
            builder = builder.with_initialization_script(NO_TEXT_SELECT_SCRIPT);
        }

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, Arc::clone(&events));
        builder = Self::attach_page_load_handler(builder, Arc::clone(&events));
        builder = Self::attach_title_handler(builder, Arc::clone(&events));
        builder = Self::attach_navigation_handler(
            builder,
            Arc::clone(&events),
            config.allowed_origins.clone(),
        );

        let webview = builder.build(window)?;

        debug!(url = %config.url, devtools = config.devtools, "WebView created");

        Ok(WebViewHandle {
            webview,
            current_url: config.url,
        })
    }
}
