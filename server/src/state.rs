//! Shared handler state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ProxyError;

/// Cloned into every proxy handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub backend_url: Arc<str>,
}

impl AppState {
    /// Builds the upstream HTTP client from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ServerConfig) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .connect_timeout(config.upstream_connect_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProxyError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, backend_url: Arc::from(config.backend_url.as_str()) })
    }
}
