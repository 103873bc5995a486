use serde::{Deserialize, Serialize};

/// Log filter used when neither `RUST_LOG` nor `--log-level` is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "localflare=info".into(),
        }
    }
}
