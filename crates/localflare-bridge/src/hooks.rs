//! Request hooks and per-status error handlers.
//!
//! Hooks run around every request as one axum middleware:
//! `before_request` hooks in registration order, the first reply wins and
//! skips the route; then error handlers replace 4xx/5xx responses outside
//! the bridge endpoints; then `after_request` hooks in reverse registration
//! order, including for short-circuited requests.
//!
//! Hooks are synchronous and run on the server's async workers, so they
//! should stay quick. A panicking hook is logged and treated as absent,
//! except a panicking `before_request` hook, which answers 500.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::response::Parts;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, warn};

use crate::proxy::inject_proxy;
use crate::registry::panic_message;
use crate::server::{PING_PATH, SEND_PATH};

/// Request data visible to hooks and error handlers.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    headers: BTreeMap<String, String>,
}

impl RequestInfo {
    fn from_request(request: &Request) -> Self {
        let headers = request
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        Self {
            method: request.method().as_str().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            headers,
        }
    }

    /// Header value by case-insensitive name. Non-text values are absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the request targets `/api/send` or `/api/ping`.
    pub fn is_bridge_call(&self) -> bool {
        self.path == SEND_PATH || self.path == PING_PATH
    }
}

/// A response produced by a hook or an error handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
}

impl Reply {
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::with_type(status, body, "text/plain; charset=utf-8")
    }

    /// An HTML reply. Full documents get the call-proxy like pages do.
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        let body = inject_proxy(&body.into());
        Self::with_type(status, body, "text/html; charset=utf-8")
    }

    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::with_type(status, body.to_string(), "application/json")
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn with_type(status: u16, body: impl Into<String>, content_type: &str) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: content_type.to_string(),
            headers: Vec::new(),
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or_else(|_| {
            warn!(status = self.status, "invalid reply status, answering 500");
            StatusCode::INTERNAL_SERVER_ERROR
        });
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        for (name, value) in self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "invalid reply header dropped"),
            }
        }
        response
    }
}

/// Mutable view of an outgoing response for `after_request` hooks.
pub struct ResponseInfo<'a> {
    parts: &'a mut Parts,
}

impl ResponseInfo<'_> {
    pub fn status(&self) -> u16 {
        self.parts.status.as_u16()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set or replace a header. Returns `false` if the name or value is not
    /// a valid header.
    pub fn set_header(&mut self, name: &str, value: &str) -> bool {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.parts.headers.insert(name, value);
                true
            }
            _ => false,
        }
    }
}

/// What an error handler is told about the failed request.
#[derive(Debug)]
pub struct ErrorContext<'a> {
    pub request: &'a RequestInfo,
    pub status: u16,
    /// The page handler's error for page failures, otherwise a short
    /// description such as `Not found: /missing`.
    pub message: String,
}

/// Marks a 500 produced by a failing page handler and carries its error.
#[derive(Debug, Clone)]
pub(crate) struct PageFailure(pub(crate) String);

type BeforeHook = Arc<dyn Fn(&RequestInfo) -> Option<Reply> + Send + Sync>;
type AfterHook = Arc<dyn Fn(&RequestInfo, &mut ResponseInfo<'_>) + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(&ErrorContext<'_>) -> Reply + Send + Sync>;

/// Registered hooks and error handlers.
#[derive(Clone, Default)]
pub struct RequestHooks {
    before: Vec<BeforeHook>,
    after: Vec<AfterHook>,
    error_handlers: HashMap<u16, ErrorHandler>,
}

impl RequestHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` before routing. Returning a reply answers the request
    /// without reaching the route.
    pub fn before_request<F>(&mut self, hook: F)
    where
        F: Fn(&RequestInfo) -> Option<Reply> + Send + Sync + 'static,
    {
        self.before.push(Arc::new(hook));
    }

    /// Run `hook` on every response before it is sent.
    pub fn after_request<F>(&mut self, hook: F)
    where
        F: Fn(&RequestInfo, &mut ResponseInfo<'_>) + Send + Sync + 'static,
    {
        self.after.push(Arc::new(hook));
    }

    /// Answer responses with `status` using `handler`. Bridge endpoint
    /// responses keep their JSON bodies. The last handler for a status wins.
    pub fn error_handler<F>(&mut self, status: u16, handler: F)
    where
        F: Fn(&ErrorContext<'_>) -> Reply + Send + Sync + 'static,
    {
        if self.error_handlers.insert(status, Arc::new(handler)).is_some() {
            debug!(status, "error handler replaced");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.error_handlers.is_empty()
    }

    fn run_before(&self, info: &RequestInfo) -> Option<Reply> {
        self.before.iter().find_map(|hook| {
            guarded("before_request", || hook(info))
                .unwrap_or_else(|| Some(Reply::text(500, "before_request hook failed")))
        })
    }

    fn apply_error_handler(&self, info: &RequestInfo, response: Response) -> Response {
        let status = response.status();
        if !(status.is_client_error() || status.is_server_error()) || info.is_bridge_call() {
            return response;
        }
        let Some(handler) = self.error_handlers.get(&status.as_u16()) else {
            return response;
        };

        let message = match response.extensions().get::<PageFailure>() {
            Some(PageFailure(message)) => message.clone(),
            None if status == StatusCode::NOT_FOUND => format!("Not found: {}", info.path),
            None => status.canonical_reason().unwrap_or("error").to_string(),
        };
        let ctx = ErrorContext {
            request: info,
            status: status.as_u16(),
            message,
        };
        match guarded("error handler", || handler(&ctx)) {
            Some(reply) => reply.into_response(),
            None => response,
        }
    }

    fn run_after(&self, info: &RequestInfo, response: Response) -> Response {
        if self.after.is_empty() {
            return response;
        }
        let (mut parts, body) = response.into_parts();
        let mut view = ResponseInfo { parts: &mut parts };
        for hook in self.after.iter().rev() {
            guarded("after_request", || hook(info, &mut view));
        }
        Response::from_parts(parts, body)
    }
}

impl fmt::Debug for RequestHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut statuses: Vec<u16> = self.error_handlers.keys().copied().collect();
        statuses.sort_unstable();
        f.debug_struct("RequestHooks")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .field("error_handlers", &statuses)
            .finish()
    }
}

fn guarded<T>(what: &str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(panic) => {
            error!(hook = what, error = %panic_message(panic.as_ref()), "hook panicked");
            None
        }
    }
}

/// The middleware installed by `build_router`.
pub(crate) async fn run_hooks(
    State(hooks): State<Arc<RequestHooks>>,
    request: Request,
    next: Next,
) -> Response {
    if hooks.is_empty() {
        return next.run(request).await;
    }

    let info = RequestInfo::from_request(&request);
    let response = match hooks.run_before(&info) {
        Some(reply) => {
            debug!(path = %info.path, status = reply.status, "request answered by before_request hook");
            reply.into_response()
        }
        None => next.run(request).await,
    };
    let response = hooks.apply_error_handler(&info, response);
    hooks.run_after(&info, response)
}
