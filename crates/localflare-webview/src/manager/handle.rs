use wry::WebView;

/// Handle to the window's WebView.
pub struct WebViewHandle {
    pub(super) webview: WebView,
    /// Current URL (best-effort tracking).
    pub(super) current_url: String,
}

impl WebViewHandle {
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Ask the page to confirm closing; it answers with a `close_confirmed`
    /// IPC message if the user accepts.
    pub fn request_close_confirmation(&self, message: &str) -> Result<(), wry::Error> {
        self.webview
            .evaluate_script(&crate::ipc::js_confirm_close(message))
    }

    /// Set the WebView bounds (position + size) within the window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    pub fn focus(&self) -> Result<(), wry::Error> {
        self.webview.focus()
    }

    /// Update the tracked URL after a navigation event.
    pub fn set_url(&mut self, url: String) {
        self.current_url = url;
    }
}
