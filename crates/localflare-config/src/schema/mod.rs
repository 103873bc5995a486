//! Configuration schema types for LocalFlare.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod server;
mod startup;
mod window;

pub use logging::*;
pub use server::*;
pub use startup::*;
pub use window::*;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for a LocalFlare application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Enables webview devtools and verbose request logging.
    pub debug: bool,
    /// Directory `render_template` reads from. When unset, template names
    /// are treated as inline template source.
    pub template_folder: Option<PathBuf>,
    pub server: ServerConfig,
    pub window: WindowConfig,
    pub startup: StartupConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_release_mode() {
        let config = AppConfig::default();
        assert!(!config.debug);
        assert!(config.template_folder.is_none());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.window.title, "LocalFlare App");
        assert_eq!(config.logging.level, "localflare=info");
    }
}
