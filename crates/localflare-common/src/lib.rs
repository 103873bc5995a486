pub mod errors;

pub use errors::{BridgeError, ConfigError, FlareError, ShellError, StartupError, TemplateError};

pub type Result<T> = std::result::Result<T, FlareError>;
