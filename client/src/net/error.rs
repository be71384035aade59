//! Error taxonomy for requests issued by the client.
//!
//! Validation failures are not represented here; forms report those as
//! `FormErrors` before any request is built.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use thiserror::Error;

use super::types::ErrorBody;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Request failure as seen by queries, mutations, and views.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never reached the server.
    #[error("Unable to reach the server: {0}")]
    Network(String),
    /// The request was aborted after the configured timeout.
    #[error("Request timed out. Please try again.")]
    Timeout,
    /// The server answered with a non-2xx status.
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    /// A 2xx response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
    /// The request body could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(String),
    /// No browser transport is available (server-side rendering).
    #[error("not available on server")]
    Unavailable,
    /// The same action is already in flight.
    #[error("request already in progress")]
    Busy,
}

impl ApiError {
    /// Builds an `Http` error from a non-2xx status and its raw body.
    ///
    /// The `message` field of the backend's JSON envelope wins; a non-JSON
    /// body is trimmed and truncated; an empty body becomes `fallback`.
    pub fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        Self::Http {
            status,
            message: extract_message(body).unwrap_or_else(|| fallback.to_owned()),
        }
    }

    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 401 response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Message suitable for an error banner.
    ///
    /// Server-reported messages are shown verbatim; every other failure shows
    /// `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Http { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(envelope) = serde_json::from_str::<ErrorBody>(trimmed) {
        return envelope
            .message
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty());
    }
    Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
}
