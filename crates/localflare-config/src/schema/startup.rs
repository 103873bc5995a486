//! Startup synchronization timing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long to wait for the local server before giving up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Total time allowed for the server to answer `/api/ping`.
    pub timeout_ms: u64,
    /// Delay between readiness checks.
    pub poll_interval_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl StartupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
