//! Native window shell.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop: one window holding one WebView pointed at the local server.

mod core;
mod event_handler;
mod init;
mod polling;
mod types;

use winit::event_loop::EventLoop;

use localflare_bridge::ServerHandle;
use localflare_common::{Result, ShellError};
use localflare_config::AppConfig;

use self::core::FlareShell;

/// Open the window and block in its event loop until it closes.
pub(crate) fn run(config: AppConfig, server: ServerHandle) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| ShellError::EventLoop(e.to_string()))?;

    let mut shell = FlareShell::new(config, server);
    event_loop
        .run_app(&mut shell)
        .map_err(|e| ShellError::EventLoop(e.to_string()))?;

    match shell.failure.take() {
        Some(err) => Err(err.into()),
        None => {
            tracing::info!("window closed");
            Ok(())
        }
    }
}
