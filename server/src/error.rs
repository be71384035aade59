//! Host-side error type.
//!
//! ERROR HANDLING
//! ==============
//! Upstream failures surface to the browser as `502 Bad Gateway` with the
//! same `{ "message": ... }` envelope the backend uses, so the client's error
//! parsing needs no special case for the proxy.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),

    /// The upstream HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The incoming request body could not be read.
    #[error("request body read failed: {0}")]
    Body(String),

    /// The incoming request body exceeds the relay limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The backend could not be reached or its response could not be read.
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::Body(_) => "Invalid request body",
            Self::BodyTooLarge { .. } => "Request body too large",
            Self::Upstream(_) => "Backend unavailable",
            Self::Config(_) | Self::HttpClientBuild(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "message": self.public_message() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
