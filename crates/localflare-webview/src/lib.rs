//! WebView bridge for the LocalFlare window.
//!
//! Wraps the `wry` crate to provide:
//! - A single top-level WebView pointed at the local server
//! - A small IPC channel (JavaScript -> Rust) for window-level requests
//! - A navigation allowlist pinned to the local server origin
//! - Event queueing (page load, title change, IPC, navigation)

pub mod events;
pub mod ipc;
pub mod manager;

pub use events::{PageLoadState, WebViewEvent};
pub use ipc::IpcMessage;
pub use manager::{WebViewConfig, WebViewHandle, WebViewManager};
