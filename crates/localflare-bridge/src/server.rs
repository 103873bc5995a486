//! HTTP server: bridge endpoint, liveness endpoint, and page routes.
//!
//! The server runs on its own thread with a dedicated tokio runtime and
//! lives until the process exits.

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::JoinHandle;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, MethodFilter, MethodRouter};
use axum::{Json, Router};
use localflare_common::{BridgeError, StartupError};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::envelope::{error_body, status_for, success_body, RequestEnvelope};
use crate::hooks::{run_hooks, PageFailure, RequestHooks};
use crate::pages::{PageHandler, PageMethod, PageRequest, PageRoutes};
use crate::proxy::inject_proxy;
use crate::registry::MessageRegistry;

/// Bridge endpoint path.
pub const SEND_PATH: &str = "/api/send";
/// Liveness endpoint path.
pub const PING_PATH: &str = "/api/ping";

/// Router settings beyond the handler tables.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Largest accepted `/api/send` body in bytes. `None` accepts any size.
    pub max_body_bytes: Option<usize>,
    pub hooks: RequestHooks,
}

/// Build the application router.
///
/// Malformed or conflicting page patterns are reported as
/// `StartupError::Route`. Page routes that collide with the API paths are
/// skipped.
pub fn build_router(
    registry: Arc<MessageRegistry>,
    pages: &PageRoutes,
    options: RouterOptions,
) -> Result<Router, StartupError> {
    pages.check(&[SEND_PATH, PING_PATH])?;

    let mut router: Router<Arc<MessageRegistry>> = Router::new();
    for (path, handlers) in pages.iter() {
        if path == SEND_PATH || path == PING_PATH {
            warn!(path, "page route shadows a bridge endpoint, skipping");
            continue;
        }
        let mut methods: MethodRouter<Arc<MessageRegistry>> = MethodRouter::new();
        for (&method, handler) in handlers {
            let handler = Arc::clone(handler);
            methods = methods.on(
                method_filter(method),
                move |uri: Uri,
                      Query(query): Query<HashMap<String, String>>,
                      params: Option<Path<HashMap<String, String>>>,
                      body: Bytes| {
                    let handler = Arc::clone(&handler);
                    let request = PageRequest {
                        method,
                        path: uri.path().to_string(),
                        query,
                        params: params.map(|Path(p)| p).unwrap_or_default(),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    };
                    async move { serve_page(handler, request).await }
                },
            );
        }
        router = router.route(path, methods);
    }

    let body_limit = match options.max_body_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Ok(router
        .route(SEND_PATH, post(send_message).layer(body_limit))
        .route(PING_PATH, get(ping))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            Arc::new(options.hooks),
            run_hooks,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(registry))
}

fn method_filter(method: PageMethod) -> MethodFilter {
    match method {
        PageMethod::Get => MethodFilter::GET,
        PageMethod::Post => MethodFilter::POST,
        PageMethod::Put => MethodFilter::PUT,
        PageMethod::Patch => MethodFilter::PATCH,
        PageMethod::Delete => MethodFilter::DELETE,
    }
}

/// Handle `POST /api/send`.
async fn send_message(
    State(registry): State<Arc<MessageRegistry>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "bridge call rejected: unreadable body");
            return (StatusCode::BAD_REQUEST, Json(error_body(rejection.body_text())))
                .into_response();
        }
    };

    let envelope = match RequestEnvelope::from_slice(&body) {
        Ok(env) => env,
        Err(e) => {
            warn!(body_len = body.len(), "bridge call rejected: malformed envelope");
            return bridge_error_response(&e);
        }
    };

    let RequestEnvelope { message_type, data } = envelope;
    debug!(message_type = %message_type, "bridge call");

    let call_type = message_type.clone();
    let outcome = tokio::task::spawn_blocking(move || registry.dispatch(&call_type, data))
        .await
        .unwrap_or_else(|e| Err(BridgeError::HandlerError(e.to_string())));

    match outcome {
        Ok(result) => (StatusCode::OK, Json(success_body(result))).into_response(),
        Err(e) => {
            match &e {
                BridgeError::UnknownMessageType(_) => {
                    warn!(message_type = %message_type, "no handler for message type");
                }
                _ => warn!(message_type = %message_type, error = %e, "handler failed"),
            }
            bridge_error_response(&e)
        }
    }
}

/// Handle `GET /api/ping`.
async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(error_body(format!("Not found: {}", uri.path()))),
    )
        .into_response()
}

async fn serve_page(handler: PageHandler, request: PageRequest) -> Response {
    let path = request.path.clone();
    let method = request.method;
    let rendered = tokio::task::spawn_blocking(move || handler(&request))
        .await
        .unwrap_or_else(|e| Err(e.to_string()));

    match rendered {
        Ok(text) => Html(inject_proxy(&text)).into_response(),
        Err(e) => {
            error!(path = %path, %method, error = %e, "page handler failed");
            let mut response = (StatusCode::INTERNAL_SERVER_ERROR, e.clone()).into_response();
            response.extensions_mut().insert(PageFailure(e));
            response
        }
    }
}

fn bridge_error_response(err: &BridgeError) -> Response {
    (status_for(err), Json(error_body(err))).into_response()
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Bind the listening socket on the calling thread so address errors surface
/// before anything else starts.
pub fn bind(addr: &str) -> Result<TcpListener, StartupError> {
    let listener = TcpListener::bind(addr).map_err(|source| StartupError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| StartupError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    Ok(listener)
}

/// Handle to the background server thread.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    thread: JoinHandle<()>,
}

impl ServerHandle {
    /// The actual bound address (resolves port `0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ping_url(&self) -> String {
        format!("{}{PING_PATH}", self.base_url())
    }

    /// Whether the server thread is still alive.
    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }
}

/// Serve `router` on `listener` from a new `localflare-server` thread.
pub fn spawn_server(listener: TcpListener, router: Router) -> Result<ServerHandle, StartupError> {
    let addr = listener.local_addr().map_err(StartupError::Runtime)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("localflare-worker")
        .build()
        .map_err(StartupError::Runtime)?;

    let thread = std::thread::Builder::new()
        .name("localflare-server".into())
        .spawn(move || {
            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(l) => l,
                    Err(e) => {
                        error!(error = %e, "failed to register listener with runtime");
                        return;
                    }
                };
                info!(addr = %addr, "HTTP server listening");
                if let Err(e) = axum::serve(listener, router).await {
                    error!(error = %e, "HTTP server error");
                }
            });
        })
        .map_err(StartupError::Runtime)?;

    Ok(ServerHandle { addr, thread })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderMap, Request};
    use crate::hooks::Reply;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let mut registry = MessageRegistry::new();
        registry.register("echo", |data: Value| Ok::<_, String>(data));
        registry.register("boom", |_| Err::<Value, _>("bad"));
        registry.register("panic", |_| -> Result<Value, String> { panic!("handler blew up") });

        let mut pages = PageRoutes::new();
        pages.insert("/", |_: &PageRequest| {
            Ok::<_, String>("<html><head><title>T</title></head><body>hi</body></html>".into())
        });
        pages.insert("/plain", |_: &PageRequest| Ok::<_, String>("just text".into()));
        pages.insert("/files", |req: &PageRequest| {
            Ok::<_, String>(format!("dir={}", req.query("dir").unwrap_or("-")))
        });
        pages.insert("/users/:id", |req: &PageRequest| {
            Ok::<_, String>(format!("user {}", req.param("id").unwrap_or("?")))
        });
        pages.insert("/broken", |_: &PageRequest| Err::<String, _>("template missing"));
        pages.insert(SEND_PATH, |_: &PageRequest| Ok::<_, String>("shadow".into()));

        pages.insert_for("/form", &[PageMethod::Post, PageMethod::Put], |req: &PageRequest| {
            Ok::<_, String>(format!("{} {}", req.method, req.body))
        });

        build_router(Arc::new(registry), &pages, RouterOptions::default()).unwrap()
    }

    fn hooked_router() -> Router {
        let mut pages = PageRoutes::new();
        pages.insert("/", |_: &PageRequest| Ok::<_, String>("home".into()));
        pages.insert("/broken", |_: &PageRequest| Err::<String, _>("template missing"));

        let mut hooks = RequestHooks::new();
        hooks.before_request(|req| {
            (req.path == "/private" && req.header("x-token") != Some("secret"))
                .then(|| Reply::text(401, "token required"))
        });
        hooks.after_request(|_, resp| {
            resp.set_header("x-served-by", "localflare");
        });
        hooks.error_handler(404, |ctx| {
            Reply::html(404, format!("<p>{} ({})</p>", ctx.message, ctx.request.method))
        });
        hooks.error_handler(500, |ctx| Reply::text(500, format!("sorry: {}", ctx.message)));

        let options = RouterOptions {
            hooks,
            ..RouterOptions::default()
        };
        build_router(Arc::new(MessageRegistry::new()), &pages, options).unwrap()
    }

    async fn send_raw(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_send(router: Router, body: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(SEND_PATH)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_text(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn echo_returns_success_envelope() {
        let (status, body) =
            post_send(test_router(), r#"{"type":"echo","data":{"x":1}}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "result": {"x": 1}}));
    }

    #[tokio::test]
    async fn unknown_type_is_404() {
        let (status, body) = post_send(test_router(), r#"{"type":"ghost","data":{}}"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "No handler for message type: ghost"}));
    }

    #[tokio::test]
    async fn handler_error_is_500() {
        let (status, body) = post_send(test_router(), r#"{"type":"boom","data":{}}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "bad"}));
    }

    #[tokio::test]
    async fn handler_panic_is_500_and_server_survives() {
        let router = test_router();
        let (status, body) = post_send(router.clone(), r#"{"type":"panic"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "handler blew up"}));

        let (status, _) = post_send(router, r#"{"type":"echo"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_type_is_400() {
        let (status, body) = post_send(test_router(), r#"{"data":{}}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid message format"}));
    }

    #[tokio::test]
    async fn invalid_json_is_400() {
        let (status, body) = post_send(test_router(), "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_data_is_empty_object() {
        let (status, body) = post_send(test_router(), r#"{"type":"echo"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!({}));
    }

    #[tokio::test]
    async fn ping_reports_ok() {
        let (status, body) = get_text(test_router(), PING_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn html_pages_get_the_proxy() {
        let (status, body) = get_text(test_router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches("data-localflare-proxy").count(), 1);
        assert!(body.contains("</script></head>"));
    }

    #[tokio::test]
    async fn plain_pages_pass_through() {
        let (status, body) = get_text(test_router(), "/plain").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "just text");
    }

    #[tokio::test]
    async fn page_handlers_see_query_and_params() {
        let (_, body) = get_text(test_router(), "/files?dir=%2Ftmp").await;
        assert_eq!(body, "dir=/tmp");

        let (_, body) = get_text(test_router(), "/users/42").await;
        assert_eq!(body, "user 42");
    }

    #[tokio::test]
    async fn failing_page_is_500() {
        let (status, body) = get_text(test_router(), "/broken").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "template missing");
    }

    #[tokio::test]
    async fn page_cannot_shadow_bridge_endpoint() {
        let (status, body) = post_send(test_router(), r#"{"type":"echo","data":1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(1));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (status, body) = get_text(test_router(), "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"error": "Not found: /nowhere"})
        );
    }

    #[tokio::test]
    async fn bodies_over_two_megabytes_are_accepted() {
        let big = "x".repeat(3 * 1024 * 1024);
        let body = json!({"type": "echo", "data": {"blob": big}}).to_string();
        let (status, reply) = post_send(test_router(), &body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["result"]["blob"].as_str().map(str::len), Some(3 * 1024 * 1024));
    }

    #[tokio::test]
    async fn configured_body_limit_answers_json_400() {
        let mut registry = MessageRegistry::new();
        registry.register("echo", |data: Value| Ok::<_, String>(data));
        let options = RouterOptions {
            max_body_bytes: Some(64),
            ..RouterOptions::default()
        };
        let router = build_router(Arc::new(registry), &PageRoutes::new(), options).unwrap();

        let body = json!({"type": "echo", "data": "y".repeat(200)}).to_string();
        let (status, reply) = post_send(router.clone(), &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(reply["error"].as_str().is_some_and(|e| !e.is_empty()));

        let (status, _) = post_send(router, r#"{"type":"echo"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn conflicting_page_routes_are_an_error() {
        let mut pages = PageRoutes::new();
        pages.insert("/users/:id", |_: &PageRequest| Ok::<_, String>("a".into()));
        pages.insert("/users/:name", |_: &PageRequest| Ok::<_, String>("b".into()));
        let err = build_router(Arc::new(MessageRegistry::new()), &pages, RouterOptions::default())
            .unwrap_err();
        assert!(matches!(err, StartupError::Route { .. }));
    }

    #[tokio::test]
    async fn pages_answer_their_listed_methods() {
        let request = Request::builder()
            .method("POST")
            .uri("/form")
            .body(Body::from("name=ada"))
            .unwrap();
        let (status, _, body) = send_raw(test_router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "POST name=ada");

        let (status, _) = get_text(test_router(), "/form").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn before_hook_short_circuits_and_after_hook_still_runs() {
        let request = Request::builder().uri("/private").body(Body::empty()).unwrap();
        let (status, headers, body) = send_raw(hooked_router(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "token required");
        assert_eq!(headers["x-served-by"], "localflare");
    }

    #[tokio::test]
    async fn after_hook_sees_normal_pages() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, headers, body) = send_raw(hooked_router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "home");
        assert_eq!(headers["x-served-by"], "localflare");
    }

    #[tokio::test]
    async fn error_handler_replaces_not_found() {
        let (status, body) = get_text(hooked_router(), "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "<p>Not found: /missing (GET)</p>");
    }

    #[tokio::test]
    async fn error_handler_sees_page_failure_message() {
        let (status, body) = get_text(hooked_router(), "/broken").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "sorry: template missing");
    }

    #[tokio::test]
    async fn bridge_errors_keep_json_under_error_handlers() {
        let (status, body) = post_send(hooked_router(), r#"{"type":"ghost"}"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "No handler for message type: ghost"}));
    }

    #[tokio::test]
    async fn spawned_server_answers_over_tcp() {
        let listener = bind("127.0.0.1:0").unwrap();
        let handle = spawn_server(listener, test_router()).unwrap();
        assert!(handle.local_addr().port() != 0);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let mut ready = false;
        for _ in 0..50 {
            if let Ok(resp) = client.get(handle.ping_url()).send().await {
                ready = resp.status().is_success();
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(ready);
        assert!(handle.is_running());

        let resp = client
            .post(format!("{}{SEND_PATH}", handle.base_url()))
            .json(&json!({"type": "echo", "data": {"x": 1}}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"success": true, "result": {"x": 1}}));
    }

    #[test]
    fn binding_a_taken_port_fails() {
        let first = bind("127.0.0.1:0").unwrap();
        let addr = first.local_addr().unwrap().to_string();
        let err = bind(&addr).unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
    }
}
