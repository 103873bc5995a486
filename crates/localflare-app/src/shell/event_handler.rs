//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::core::FlareShell;
use super::types::CLOSE_PROMPT;

impl ApplicationHandler for FlareShell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.initialize_window(event_loop) {
            tracing::error!("Failed to open window: {e}");
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.handle_close_request(event_loop),

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_webview_bounds(size.width, size.height);
                }
            }

            WindowEvent::Focused(true) => {
                if let Some(webview) = &self.webview {
                    let _ = webview.focus();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}

impl FlareShell {
    /// Close now, or ask the page first when `confirm_close` is set.
    fn handle_close_request(&mut self, event_loop: &ActiveEventLoop) {
        tracing::info!("Window close requested");

        let webview = match &self.webview {
            Some(webview) if self.config.window.confirm_close => webview,
            _ => {
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = webview.request_close_confirmation(CLOSE_PROMPT) {
            tracing::warn!(error = %e, "close confirmation failed, closing anyway");
            event_loop.exit();
        }
    }
}
