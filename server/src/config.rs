//! Host configuration parsed from environment variables.
//!
//! `main` loads `.env` through `dotenvy` first, so local development can keep
//! these values in a file.

use std::time::Duration;

use crate::error::ProxyError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5656";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Origin of the backend API, without a trailing slash.
    pub backend_url: String,
    pub port: u16,
    pub upstream_timeout: Duration,
    pub upstream_connect_timeout: Duration,
}

impl ServerConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `BACKEND_URL`: default `http://localhost:5656`
    /// - `PORT`: default 3000
    /// - `UPSTREAM_TIMEOUT_SECS`: default 30
    /// - `UPSTREAM_CONNECT_TIMEOUT_SECS`: default 5
    ///
    /// # Errors
    ///
    /// Returns an error when `PORT` is set but not a valid port number, or
    /// when `BACKEND_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Self, ProxyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProxyError> {
        let backend_url = parse_backend_url(lookup("BACKEND_URL").as_deref())?;
        let port = parse_port(lookup("PORT").as_deref())?;
        let upstream_timeout = Duration::from_secs(parse_secs(
            lookup("UPSTREAM_TIMEOUT_SECS").as_deref(),
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        ));
        let upstream_connect_timeout = Duration::from_secs(parse_secs(
            lookup("UPSTREAM_CONNECT_TIMEOUT_SECS").as_deref(),
            DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS,
        ));

        Ok(Self { backend_url, port, upstream_timeout, upstream_connect_timeout })
    }
}

fn parse_backend_url(raw: Option<&str>) -> Result<String, ProxyError> {
    let value = raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(DEFAULT_BACKEND_URL);
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ProxyError::Config(format!("BACKEND_URL must be an http(s) URL: {value}")));
    }
    Ok(value.trim_end_matches('/').to_owned())
}

fn parse_port(raw: Option<&str>) -> Result<u16, ProxyError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| ProxyError::Config(format!("invalid PORT: {value}"))),
    }
}

fn parse_secs(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
