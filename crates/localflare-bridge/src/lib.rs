//! Request/response bridge between a webpage and Rust handlers.
//!
//! - `registry`: message-type → handler table and synchronous dispatch
//! - `envelope`: `{type, data}` request parsing and status mapping
//! - `proxy`: the `window.api` call-proxy script and its HTML injection
//! - `pages`: page routes (per-method, pattern-checked) whose HTML output
//!   gets the proxy injected
//! - `hooks`: before/after request hooks and per-status error handlers
//! - `templates`: `{{ key }}` template rendering from a folder or inline
//! - `server`: the axum router and the background server thread
//! - `startup`: readiness polling against `/api/ping`

pub mod envelope;
pub mod hooks;
pub mod pages;
pub mod proxy;
pub mod registry;
pub mod server;
pub mod startup;
pub mod templates;

pub use envelope::RequestEnvelope;
pub use hooks::{ErrorContext, Reply, RequestHooks, RequestInfo, ResponseInfo};
pub use pages::{PageMethod, PageRequest, PageRoutes};
pub use proxy::inject_proxy;
pub use registry::MessageRegistry;
pub use server::{bind, build_router, spawn_server, RouterOptions, ServerHandle, PING_PATH, SEND_PATH};
pub use startup::{wait_for_server, wait_for_server_blocking};
pub use templates::TemplateRenderer;
