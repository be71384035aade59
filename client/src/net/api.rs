//! REST API helpers for the backend's auth and page-data endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Non-2xx responses become
//! `ApiError::Http` carrying the envelope's `message` or a per-endpoint
//! fallback, so views can show one banner line without inspecting bodies.
//! The one exception is logout, whose response status is ignored.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, Transport};
use super::types::{LoginData, RegisterData, ResetConfirmData, ResetRequestData, User};

pub const LOGIN_ENDPOINT: &str = "/auth/login/onsubmit";
pub const REGISTER_ENDPOINT: &str = "/auth/register/onsubmit";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout/onsubmit";
pub const CURRENT_USER_ENDPOINT: &str = "/auth/me";
pub const RESET_REQUEST_ENDPOINT: &str = "/auth/reset-request/onsubmit";
pub const RESET_CONFIRM_ENDPOINT: &str = "/auth/reset-confirm/onsubmit";

fn page_data_endpoint(page: &str) -> String {
    format!("/{}/onload", page.trim_matches('/'))
}

fn page_data_failed_message(page: &str) -> String {
    format!("Failed to load {page} data")
}

/// Thin client over the HTTP transport. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `POST /auth/login/onsubmit`. The server sets the session cookie.
    ///
    /// # Errors
    ///
    /// Returns the server's message (or "Login failed") on a non-2xx status.
    pub async fn login(&self, data: &LoginData) -> Result<User, ApiError> {
        let response = self.post_json(LOGIN_ENDPOINT, data).await?;
        json_or_error(&response, "Login failed")
    }

    /// `POST /auth/register/onsubmit`.
    ///
    /// # Errors
    ///
    /// Returns the server's message (or "Registration failed") on a non-2xx status.
    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        let response = self.post_json(REGISTER_ENDPOINT, data).await?;
        json_or_error(&response, "Registration failed")
    }

    /// `POST /auth/logout/onsubmit`. The response status is not inspected.
    ///
    /// # Errors
    ///
    /// Returns an error only when the request itself could not be sent.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.transport.send(HttpRequest::post(LOGOUT_ENDPOINT, None)).await?;
        if !response.ok() {
            log::debug!("logout returned status {}", response.status);
        }
        Ok(())
    }

    /// `GET /auth/me`. Any non-2xx answer maps to a generic "Not authenticated"
    /// error that keeps the status so 401 can be told apart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` for non-2xx statuses and transport errors as-is.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let response = self.transport.send(HttpRequest::get(CURRENT_USER_ENDPOINT)).await?;
        if !response.ok() {
            return Err(ApiError::Http {
                status: response.status,
                message: "Not authenticated".to_owned(),
            });
        }
        decode(&response.body)
    }

    /// `POST /auth/reset-request/onsubmit`.
    ///
    /// # Errors
    ///
    /// Returns the server's message (or "Reset request failed") on a non-2xx status.
    pub async fn reset_request(&self, email: &str) -> Result<(), ApiError> {
        let body = ResetRequestData {
            email: email.to_owned(),
        };
        let response = self.post_json(RESET_REQUEST_ENDPOINT, &body).await?;
        empty_or_error(&response, "Reset request failed")
    }

    /// `POST /auth/reset-confirm/onsubmit`.
    ///
    /// # Errors
    ///
    /// Returns the server's message (or "Password reset failed") on a non-2xx status.
    pub async fn reset_confirm(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let body = ResetConfirmData {
            token: token.to_owned(),
            new_password: new_password.to_owned(),
        };
        let response = self.post_json(RESET_CONFIRM_ENDPOINT, &body).await?;
        empty_or_error(&response, "Password reset failed")
    }

    /// `GET /{page}/onload`.
    ///
    /// # Errors
    ///
    /// Returns the server's message (or "Failed to load {page} data") on a non-2xx status.
    pub async fn page_data<T: DeserializeOwned>(&self, page: &str) -> Result<T, ApiError> {
        let response = self.transport.send(HttpRequest::get(page_data_endpoint(page))).await?;
        json_or_error(&response, &page_data_failed_message(page))
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<HttpResponse, ApiError> {
        let payload = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.transport.send(HttpRequest::post(path, Some(payload))).await
    }
}

fn json_or_error<T: DeserializeOwned>(response: &HttpResponse, fallback: &str) -> Result<T, ApiError> {
    if response.ok() {
        decode(&response.body)
    } else {
        Err(ApiError::from_status(response.status, &response.body, fallback))
    }
}

fn empty_or_error(response: &HttpResponse, fallback: &str) -> Result<(), ApiError> {
    if response.ok() {
        Ok(())
    } else {
        Err(ApiError::from_status(response.status, &response.body, fallback))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
