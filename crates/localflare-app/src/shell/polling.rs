//! WebView event polling.

use std::time::Instant;

use winit::event_loop::{ActiveEventLoop, ControlFlow};

use localflare_webview::ipc::CLOSE_CONFIRMED;
use localflare_webview::{IpcMessage, PageLoadState, WebViewEvent};

use super::core::FlareShell;
use super::types::POLL_INTERVAL;

impl FlareShell {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_webview_events();
            let running = self.server.is_running();
            self.observe_server(running);
        }

        if self.should_exit {
            event_loop.exit();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
        }
    }

    /// Track server liveness. Returns `true` only on the poll where the
    /// server is first seen stopped, which is the one that logs.
    fn observe_server(&mut self, running: bool) -> bool {
        if running || self.server_stopped {
            return false;
        }
        self.server_stopped = true;
        tracing::error!("server thread stopped; page requests will fail");
        true
    }

    fn poll_webview_events(&mut self) {
        for event in self.webview_events.drain_events() {
            self.handle_webview_event(event);
        }
    }

    fn handle_webview_event(&mut self, event: WebViewEvent) {
        match event {
            WebViewEvent::IpcMessage { body } => match IpcMessage::from_json(&body) {
                Some(msg) if msg.kind == CLOSE_CONFIRMED => {
                    tracing::info!("close confirmed by page");
                    self.should_exit = true;
                }
                Some(msg) => tracing::debug!(kind = %msg.kind, "unhandled IPC message"),
                None => tracing::warn!(body_len = body.len(), "malformed IPC message"),
            },
            WebViewEvent::PageLoad { state, url } => {
                if state == PageLoadState::Finished {
                    tracing::debug!(url = %url, "page loaded");
                    if let Some(webview) = &mut self.webview {
                        webview.set_url(url);
                    }
                }
            }
            WebViewEvent::TitleChanged { title } => {
                tracing::debug!(title = %title, "page title changed");
            }
            WebViewEvent::NavigationRequested { .. } | WebViewEvent::NavigationBlocked { .. } => {}
        }
    }
}
