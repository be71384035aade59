//! Low-level HTTP transport seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` builds requests and interprets responses; this module only moves
//! bytes. In the browser (hydrate) requests go through `gloo-net` with
//! credentials included and an abort timeout. During SSR there is no session
//! cookie to forward, so the offline transport fails fast with
//! `ApiError::Unavailable`.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::rc::Rc;

use async_trait::async_trait;

use super::error::ApiError;
use crate::util::config::AppConfig;

/// HTTP verbs used by the endpoint table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A request relative to the page origin (or the configured API base).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    /// JSON-encoded body; `None` sends no body and no content type.
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body,
        }
    }
}

/// Status and raw body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// True for 2xx statuses.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Non-2xx statuses are not errors at this layer.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Transport used when no browser is present.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineTransport;

#[async_trait(?Send)]
impl Transport for OfflineTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Err(ApiError::Unavailable)
    }
}

/// `gloo-net` transport for the browser.
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug)]
pub struct BrowserTransport {
    config: AppConfig,
}

#[cfg(feature = "hydrate")]
impl BrowserTransport {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        use gloo_net::http::Request;
        use gloo_timers::callback::Timeout;
        use web_sys::{AbortController, RequestCredentials};

        let url = build_url(&self.config.api_base_url, &request.path);
        let controller =
            AbortController::new().map_err(|_| ApiError::Network("failed to initialize request timeout".to_owned()))?;
        let signal = controller.signal();
        let timeout_controller = controller.clone();
        let _timeout = Timeout::new(self.config.request_timeout_ms, move || timeout_controller.abort());

        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
        }
        .credentials(RequestCredentials::Include)
        .abort_signal(Some(&signal));

        let built = match request.body {
            Some(body) => builder.header("Content-Type", "application/json").body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Encode(e.to_string()))?;

        let response = built
            .send()
            .await
            .map_err(|e| classify_send_failure(&e.to_string()))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

/// Transport for the current build target.
pub fn default_transport(config: &AppConfig) -> Rc<dyn Transport> {
    #[cfg(feature = "hydrate")]
    {
        Rc::new(BrowserTransport::new(config.clone()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = config;
        Rc::new(OfflineTransport)
    }
}

/// Joins the API base and a request path. An empty base keeps the path
/// origin-relative.
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_owned()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps a fetch failure message onto `Timeout` or `Network`.
///
/// An aborted fetch only ever comes from the timeout controller.
pub fn classify_send_failure(message: &str) -> ApiError {
    let lowered = message.to_lowercase();
    if lowered.contains("timeout") || lowered.contains("abort") {
        ApiError::Timeout
    } else {
        ApiError::Network(message.to_owned())
    }
}
