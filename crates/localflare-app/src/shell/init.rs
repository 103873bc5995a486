//! Window and WebView creation.

use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use localflare_common::ShellError;
use localflare_webview::WebViewConfig;

use super::core::FlareShell;

impl FlareShell {
    /// Create the window and its WebView pointed at the server root.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ShellError> {
        let win = &self.config.window;
        let attrs = WindowAttributes::default()
            .with_title(win.title.clone())
            .with_inner_size(LogicalSize::new(f64::from(win.width), f64::from(win.height)))
            .with_resizable(win.resizable);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| ShellError::Window(e.to_string()))?;

        let mut webview_config = WebViewConfig::for_local_server(self.server.base_url());
        webview_config.devtools = self.config.debug;
        webview_config.text_select = win.text_select;

        let webview = self
            .webview_events
            .create(&window, webview_config)
            .map_err(|e| ShellError::WebView(e.to_string()))?;

        tracing::info!(
            title = %win.title,
            width = win.width,
            height = win.height,
            url = %webview.current_url(),
            "window opened"
        );

        self.webview = Some(webview);
        self.window = Some(window);
        Ok(())
    }

    /// Resize the WebView to fill the window.
    pub(super) fn sync_webview_bounds(&self, width: u32, height: u32) {
        let Some(webview) = &self.webview else {
            return;
        };
        let bounds = wry::Rect {
            position: wry::dpi::LogicalPosition::new(0, 0).into(),
            size: wry::dpi::PhysicalSize::new(width, height).into(),
        };
        if let Err(e) = webview.set_bounds(bounds) {
            tracing::warn!(error = %e, "failed to resize webview");
        }
    }
}
