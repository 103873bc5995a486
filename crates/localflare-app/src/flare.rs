//! The `LocalFlare` application builder.

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use localflare_bridge::{
    bind, build_router, spawn_server, wait_for_server_blocking, ErrorContext, MessageRegistry,
    PageMethod, PageRequest, PageRoutes, Reply, RequestHooks, RequestInfo, ResponseInfo,
    RouterOptions, ServerHandle, TemplateRenderer,
};
use localflare_common::Result;
use localflare_config::{validation, AppConfig};

/// A LocalFlare application: message handlers, pages and config.
///
/// Handlers and pages are registered before [`run`](Self::run); the
/// registry is frozen once the server starts.
pub struct LocalFlare {
    config: AppConfig,
    registry: MessageRegistry,
    pages: PageRoutes,
    hooks: RequestHooks,
}

impl LocalFlare {
    /// New app with default config and the given window title.
    pub fn new(title: impl Into<String>) -> Self {
        let mut config = AppConfig::default();
        config.window.title = title.into();
        Self::with_config(config)
    }

    /// New app from a complete config (title included).
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            registry: MessageRegistry::new(),
            pages: PageRoutes::new(),
            hooks: RequestHooks::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Register a handler for `message_type`. A later registration for the
    /// same type replaces the earlier one.
    pub fn on_message<F, R, E>(&mut self, message_type: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Value) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: Serialize,
        E: Display,
    {
        self.registry.register(message_type, handler);
        self
    }

    /// Serve `handler`'s output at `path`. HTML documents get the
    /// `window.api` proxy injected.
    pub fn route<F, E>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&PageRequest) -> std::result::Result<String, E> + Send + Sync + 'static,
        E: Display,
    {
        self.pages.insert(path, handler);
        self
    }

    /// Like [`route`](Self::route), answering each of `methods`. The page
    /// sees the method and the request body in its [`PageRequest`].
    pub fn route_methods<F, E>(
        &mut self,
        path: impl Into<String>,
        methods: &[PageMethod],
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&PageRequest) -> std::result::Result<String, E> + Send + Sync + 'static,
        E: Display,
    {
        self.pages.insert_for(path, methods, handler);
        self
    }

    /// Run `hook` before every request; returning a reply answers the
    /// request without reaching its route.
    pub fn before_request<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&RequestInfo) -> Option<Reply> + Send + Sync + 'static,
    {
        self.hooks.before_request(hook);
        self
    }

    /// Run `hook` on every response. Later hooks run first.
    pub fn after_request<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&RequestInfo, &mut ResponseInfo<'_>) + Send + Sync + 'static,
    {
        self.hooks.after_request(hook);
        self
    }

    /// Answer page and fallback responses with `status` using `handler`.
    /// `/api/send` and `/api/ping` keep their JSON errors.
    pub fn error_handler<F>(&mut self, status: u16, handler: F) -> &mut Self
    where
        F: Fn(&ErrorContext<'_>) -> Reply + Send + Sync + 'static,
    {
        self.hooks.error_handler(status, handler);
        self
    }

    /// Renderer over the configured template folder (inline templates when
    /// none is set).
    pub fn templates(&self) -> TemplateRenderer {
        TemplateRenderer::new(self.config.template_folder.clone())
    }

    /// Registered message types, sorted.
    pub fn message_types(&self) -> Vec<&str> {
        self.registry.message_types()
    }

    /// Start the server, wait for it to answer, then open the window and
    /// block until it closes.
    ///
    /// Fails before any window exists if the config is invalid, a page
    /// pattern is malformed or conflicts with another, the port cannot be
    /// bound, or the server does not become ready in time.
    pub fn run(self) -> Result<()> {
        let (config, server) = self.start_server()?;
        crate::shell::run(config, server)
    }

    /// Validate, build the router, bind, spawn the server thread and wait
    /// for readiness.
    pub(crate) fn start_server(self) -> Result<(AppConfig, ServerHandle)> {
        let Self {
            config,
            registry,
            pages,
            hooks,
        } = self;

        validation::validate(&config)?;
        info!(
            message_types = registry.len(),
            pages = pages.len(),
            "starting LocalFlare server"
        );
        let options = RouterOptions {
            max_body_bytes: config.server.max_body_bytes,
            hooks,
        };
        let router = build_router(Arc::new(registry), &pages, options)?;
        let listener = bind(&config.server.bind_addr())?;
        let server = spawn_server(listener, router)?;
        info!(url = %server.base_url(), "server thread started");

        wait_for_server_blocking(&server.ping_url(), &config.startup)?;
        Ok((config, server))
    }
}
