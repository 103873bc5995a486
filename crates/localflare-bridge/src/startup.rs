//! Startup synchronization: poll the liveness endpoint until the server
//! answers or the timeout elapses.

use std::time::Instant;

use localflare_common::StartupError;
use localflare_config::schema::StartupConfig;
use tracing::{debug, info};

/// Poll `ping_url` every `timing.poll_interval()` until it returns a 2xx
/// status. Fails with `StartupError::Timeout` once `timing.timeout()` has
/// elapsed without a successful answer.
pub async fn wait_for_server(ping_url: &str, timing: &StartupConfig) -> Result<(), StartupError> {
    let client = readiness_client()?;
    let started = Instant::now();
    let deadline = started + timing.timeout();
    let mut attempts: u32 = 0;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(StartupError::Timeout {
                url: ping_url.to_string(),
                waited: timing.timeout(),
            });
        }

        attempts += 1;
        match tokio::time::timeout(remaining, client.get(ping_url).send()).await {
            Ok(Ok(resp)) if resp.status().is_success() => {
                info!(
                    attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "server is ready"
                );
                return Ok(());
            }
            Ok(Ok(resp)) => debug!(attempts, status = %resp.status(), "server not ready"),
            Ok(Err(e)) => debug!(attempts, error = %e, "server not reachable yet"),
            Err(_) => debug!(attempts, "readiness check timed out"),
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::sleep(timing.poll_interval().min(remaining)).await;
    }
}

/// HTTP client for readiness checks. Loopback requests must not go through a
/// system HTTP proxy.
fn readiness_client() -> Result<reqwest::Client, StartupError> {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .map_err(|e| StartupError::HttpClient(e.to_string()))
}

/// Blocking wrapper around [`wait_for_server`] for the window thread,
/// which has no runtime of its own.
pub fn wait_for_server_blocking(ping_url: &str, timing: &StartupConfig) -> Result<(), StartupError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;
    runtime.block_on(wait_for_server(ping_url, timing))
}
