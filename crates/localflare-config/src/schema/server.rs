//! HTTP server bind settings.

use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

/// Default port the local server binds to.
pub const DEFAULT_PORT: u16 = 9517;

/// Where the local HTTP server listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// `0` asks the OS for an ephemeral port.
    pub port: u16,
    /// Largest accepted `/api/send` body. Unset means no limit.
    pub max_body_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_PORT,
            max_body_bytes: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` as accepted by `TcpListener::bind`. IPv6 hosts are
    /// bracketed.
    pub fn bind_addr(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
