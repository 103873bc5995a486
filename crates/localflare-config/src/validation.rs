//! Configuration validation.
//!
//! Collects every problem into a single `ConfigError` so the user sees
//! all of them at once.

use std::net::IpAddr;

use localflare_common::ConfigError;

use crate::schema::AppConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&mut errors, config);
    validate_window(&mut errors, config);
    validate_startup(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_server(errors: &mut Vec<String>, config: &AppConfig) {
    let host = config.server.host.as_str();
    if host != "localhost" && host.parse::<IpAddr>().is_err() {
        errors.push(format!(
            "server.host = {host:?} is not an IP address or \"localhost\""
        ));
    }
}

fn validate_window(errors: &mut Vec<String>, config: &AppConfig) {
    if config.window.width == 0 {
        errors.push("window.width must be greater than 0".into());
    }
    if config.window.height == 0 {
        errors.push("window.height must be greater than 0".into());
    }
}

fn validate_startup(errors: &mut Vec<String>, config: &AppConfig) {
    let startup = &config.startup;
    if startup.poll_interval_ms == 0 {
        errors.push("startup.poll_interval_ms must be greater than 0".into());
    }
    if startup.poll_interval_ms > startup.timeout_ms {
        errors.push(format!(
            "startup.poll_interval_ms = {} exceeds startup.timeout_ms = {}",
            startup.poll_interval_ms, startup.timeout_ms
        ));
    }
}
