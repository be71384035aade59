//! Backend API forwarding.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser only ever talks to this host, so the session cookie stays
//! first-party. Every API path the client calls is relayed to the backend
//! with method, path, query string and body intact.
//!
//! DESIGN
//! ======
//! Headers are allow-listed in both directions. Hop-by-hop and host headers
//! never cross the proxy; `set-cookie` is the one response header besides
//! `content-type` that must come back so login and logout take effect.

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::{Request, State};
use axum::http::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName};
use axum::response::Response;
use http_body_util::LengthLimitError;

use crate::error::ProxyError;
use crate::state::AppState;

/// Largest request body relayed upstream.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

static REQUEST_HEADERS: [HeaderName; 3] = [CONTENT_TYPE, COOKIE, ACCEPT];
static RESPONSE_HEADERS: [HeaderName; 2] = [CONTENT_TYPE, SET_COOKIE];

/// Joins the backend origin with the incoming path and query.
pub fn upstream_url(backend_url: &str, path_and_query: &str) -> String {
    let base = backend_url.trim_end_matches('/');
    if path_and_query.starts_with('/') {
        format!("{base}{path_and_query}")
    } else {
        format!("{base}/{path_and_query}")
    }
}

fn copy_headers(source: &HeaderMap, allowed: &[HeaderName]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in allowed {
        for value in source.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// Headers forwarded from the browser to the backend.
pub fn forwarded_request_headers(incoming: &HeaderMap) -> HeaderMap {
    copy_headers(incoming, &REQUEST_HEADERS)
}

/// Headers relayed from the backend back to the browser.
pub fn relayed_response_headers(upstream: &HeaderMap) -> HeaderMap {
    copy_headers(upstream, &RESPONSE_HEADERS)
}

/// Rejects a declared body length above `MAX_BODY_BYTES` before reading it.
fn reject_large_body(headers: &HeaderMap) -> Result<(), ProxyError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    match declared {
        Some(length) if length > MAX_BODY_BYTES => Err(ProxyError::BodyTooLarge { limit: MAX_BODY_BYTES }),
        _ => Ok(()),
    }
}

/// Reads the whole request body, capped at `MAX_BODY_BYTES`.
async fn read_body(body: Body) -> Result<Bytes, ProxyError> {
    to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        let inner = e.into_inner();
        if inner.downcast_ref::<LengthLimitError>().is_some() {
            ProxyError::BodyTooLarge { limit: MAX_BODY_BYTES }
        } else {
            ProxyError::Body(inner.to_string())
        }
    })
}

/// Relays one request to the backend and its answer back to the caller.
///
/// # Errors
///
/// Returns `BodyTooLarge` above `MAX_BODY_BYTES`, `Body` when the incoming
/// body cannot be read and `Upstream` when the backend cannot be reached or
/// its body cannot be read.
pub async fn forward(State(state): State<AppState>, request: Request) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
    let url = upstream_url(&state.backend_url, path_and_query);

    reject_large_body(&parts.headers)?;
    let body = read_body(body).await?;

    let upstream = state
        .http
        .request(parts.method.clone(), &url)
        .headers(forwarded_request_headers(&parts.headers))
        .body(body)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, method = %parts.method, %url, "upstream request failed");
            ProxyError::Upstream(e.to_string())
        })?;

    let status = upstream.status();
    let headers = relayed_response_headers(upstream.headers());
    let bytes = upstream.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, %url, "upstream body read failed");
        ProxyError::Upstream(e.to_string())
    })?;

    tracing::debug!(method = %parts.method, %url, status = status.as_u16(), "proxied");

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
