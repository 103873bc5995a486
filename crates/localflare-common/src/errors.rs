use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of a single bridge call. The `Display` output is exactly the
/// message sent back to the page in the `error` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("Invalid message format")]
    MalformedRequest,

    #[error("No handler for message type: {0}")]
    UnknownMessageType(String),

    #[error("{0}")]
    HandlerError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start server runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("server at {url} did not respond within {waited:?}")]
    Timeout { url: String, waited: Duration },

    #[error("invalid page route {path}: {reason}")]
    Route { path: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("window error: {0}")]
    Window(String),

    #[error("webview error: {0}")]
    WebView(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FlareError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
