//! LocalFlare configuration system.
//!
//! TOML-based configuration with validation. Every section has defaults,
//! so an empty or partial file is a valid config.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::AppConfig;

use std::path::Path;

use localflare_common::ConfigError;

/// Load config from `path` when given, otherwise from the platform default
/// location (created with defaults if missing).
///
/// The result is not validated yet: command-line overrides go on top first,
/// then [`validation::validate`] runs before the server starts.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(p) => toml_loader::load_from_path(p),
        None => toml_loader::load_default(),
    }
}
