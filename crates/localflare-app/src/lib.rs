//! LocalFlare: build a desktop app from a local web server and a native
//! window.
//!
//! Register message handlers and pages on a [`LocalFlare`], then call
//! [`LocalFlare::run`]. The page calls handlers through `window.api`:
//!
//! ```no_run
//! use localflare_app::LocalFlare;
//! use serde_json::{json, Value};
//!
//! let mut app = LocalFlare::new("Hello");
//! app.on_message("greet", |data: Value| {
//!     let name = data["name"].as_str().unwrap_or("world");
//!     Ok::<_, String>(json!({ "greeting": format!("Hello, {name}!") }))
//! });
//! app.route("/", |_req: &localflare_app::PageRequest| {
//!     Ok::<_, String>("<html><body><h1>Hi</h1></body></html>".to_string())
//! });
//! app.run().unwrap();
//! ```

mod flare;
mod shell;

pub use flare::LocalFlare;
pub use localflare_bridge::{
    ErrorContext, PageMethod, PageRequest, Reply, RequestInfo, ResponseInfo, TemplateRenderer,
};
pub use localflare_common::{FlareError, Result};
pub use localflare_config::AppConfig;
