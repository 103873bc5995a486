//! Core TOML config loading: read from path or platform default.

use std::path::Path;

use localflare_common::ConfigError;
use tracing::info;

use crate::schema::AppConfig;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields fall back to serde defaults. Validation is left to the
/// caller so CLI overrides can be applied first.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/localflare/config.toml`
/// On Linux: `~/.config/localflare/config.toml`
///
/// If the file does not exist, writes a commented default file and returns defaults.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(AppConfig::default())
        }
        Err(e) => Err(e),
    }
}
