//! Shared setup for the LocalFlare demo binaries.

pub mod cli;
pub mod handlers;
pub mod pages;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use localflare_config::{load_config, AppConfig};

/// Log directive used when neither `--log-level` nor the config sets one.
pub const DEFAULT_LOG_DIRECTIVE: &str = "localflare=info";

/// Parse the command line, load the config, initialize logging, then apply
/// CLI overrides. `default_title` names the window when neither the config
/// file nor `--title` does. Validation happens in `LocalFlare::run`.
pub fn bootstrap(default_title: &str) -> AppConfig {
    let args = cli::parse();

    let loaded = load_config(args.config.as_deref());
    let level = args
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|c| c.logging.level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string());
    init_logging(&level);

    tracing::info!("LocalFlare v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        AppConfig::default()
    });
    args.apply(&mut config, default_title);
    config
}

/// Install the `tracing` subscriber: `RUST_LOG` plus `directive`.
pub fn init_logging(directive: &str) {
    let filter = match directive.parse::<Directive>() {
        Ok(d) => EnvFilter::from_default_env().add_directive(d),
        Err(_) => EnvFilter::new(DEFAULT_LOG_DIRECTIVE),
    };
    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
