use axum::Router;
use axum::body::to_bytes;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::{any, post};
use tower::ServiceExt;

use super::*;
use crate::config::ServerConfig;

// =============================================================================
// URL + header helpers
// =============================================================================

#[test]
fn upstream_url_joins_path_and_query() {
    assert_eq!(
        upstream_url("http://localhost:5656", "/auth/me"),
        "http://localhost:5656/auth/me"
    );
    assert_eq!(
        upstream_url("http://localhost:5656/", "/dashboard/onload?x=1"),
        "http://localhost:5656/dashboard/onload?x=1"
    );
    assert_eq!(upstream_url("http://backend", "livez"), "http://backend/livez");
}

#[test]
fn request_headers_are_allow_listed() {
    let mut incoming = HeaderMap::new();
    incoming.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    incoming.insert(COOKIE, HeaderValue::from_static("session=abc"));
    incoming.insert(ACCEPT, HeaderValue::from_static("*/*"));
    incoming.insert("host", HeaderValue::from_static("portal.example.com"));
    incoming.insert("connection", HeaderValue::from_static("keep-alive"));

    let forwarded = forwarded_request_headers(&incoming);

    assert_eq!(forwarded.len(), 3);
    assert_eq!(forwarded.get(COOKIE).unwrap(), "session=abc");
    assert!(forwarded.get("host").is_none());
}

#[test]
fn every_set_cookie_is_relayed() {
    let mut upstream = HeaderMap::new();
    upstream.append(SET_COOKIE, HeaderValue::from_static("session=abc; HttpOnly"));
    upstream.append(SET_COOKIE, HeaderValue::from_static("csrf=xyz"));
    upstream.insert("x-powered-by", HeaderValue::from_static("uvicorn"));

    let relayed = relayed_response_headers(&upstream);

    assert_eq!(relayed.get_all(SET_COOKIE).iter().count(), 2);
    assert!(relayed.get("x-powered-by").is_none());
}

// =============================================================================
// forward against an in-process fake backend
// =============================================================================

async fn echo(request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES).await.unwrap();
    let echoed = serde_json::json!({
        "method": parts.method.as_str(),
        "uri": parts.uri.to_string(),
        "cookie": parts.headers.get(COOKIE).and_then(|v| v.to_str().ok()),
        "body": String::from_utf8_lossy(&bytes),
    });
    let mut response = Response::new(Body::from(echoed.to_string()));
    *response.status_mut() = StatusCode::CREATED;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
        .headers_mut()
        .insert(SET_COOKIE, HeaderValue::from_static("session=new; HttpOnly"));
    response
}

async fn spawn_backend() -> String {
    let backend = Router::new().route("/{*path}", any(echo));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, backend).await.unwrap();
    });
    format!("http://{addr}")
}

fn proxy_router(backend_url: &str) -> Router {
    let config = ServerConfig::from_lookup(|key| (key == "BACKEND_URL").then(|| backend_url.to_owned())).unwrap();
    let state = AppState::new(&config).unwrap();
    Router::new()
        .route("/auth/login/onsubmit", post(forward))
        .with_state(state)
}

#[tokio::test]
async fn forward_preserves_request_and_relays_response() {
    let backend_url = spawn_backend().await;
    let app = proxy_router(&backend_url);

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/auth/login/onsubmit?next=%2Fdashboard")
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, "session=old")
        .body(Body::from(r#"{"email":"a@b.co","password":"x"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers().get(SET_COOKIE).unwrap(), "session=new; HttpOnly");
    let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES).await.unwrap();
    let echoed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["uri"], "/auth/login/onsubmit?next=%2Fdashboard");
    assert_eq!(echoed["cookie"], "session=old");
    assert_eq!(echoed["body"], r#"{"email":"a@b.co","password":"x"}"#);
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let app = proxy_router(&format!("http://{addr}"));

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/auth/login/onsubmit")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Backend unavailable");
}

fn unreachable_proxy() -> Router {
    // Nothing listens on port 9 here, so any upstream call would be a 502.
    proxy_router("http://127.0.0.1:9")
}

#[tokio::test]
async fn oversized_streamed_body_is_payload_too_large() {
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/auth/login/onsubmit")
        .body(Body::from(vec![b'x'; MAX_BODY_BYTES + 1]))
        .unwrap();
    let response = unreachable_proxy().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Request body too large");
}

#[tokio::test]
async fn oversized_declared_length_is_rejected_before_reading() {
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/auth/login/onsubmit")
        .header(CONTENT_LENGTH, (MAX_BODY_BYTES + 1).to_string())
        .body(Body::empty())
        .unwrap();
    let response = unreachable_proxy().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
