use std::path::PathBuf;

use clap::Parser;

use localflare_config::schema::WindowConfig;
use localflare_config::AppConfig;

/// LocalFlare demo: a native window backed by a local web server.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind the local server to.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind the local server to (0 picks a free one).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    /// Enable debug mode (devtools in the window).
    #[arg(long)]
    pub debug: bool,

    /// Folder to load page templates from.
    #[arg(long)]
    pub template_folder: Option<PathBuf>,

    /// Log level override (debug, info, warn, error, or a full directive).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AppConfig, default_title: &str) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.debug {
            config.debug = true;
        }
        if let Some(folder) = &self.template_folder {
            config.template_folder = Some(folder.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        match &self.title {
            Some(title) => config.window.title = title.clone(),
            None if config.window.title == WindowConfig::default().title => {
                config.window.title = default_title.to_string();
            }
            None => {}
        }
    }
}
