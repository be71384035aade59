//! Wire DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types mirror the backend's JSON payloads. Request bodies serialize
//! with the exact field names the endpoints expect (`new_password`, not
//! `newPassword`), and response types tolerate fields the client ignores.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// The signed-in account as returned by `/auth/me` and the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric account identifier.
    pub id: i64,
    /// Login email address.
    pub email: String,
    /// Disabled accounts cannot sign in.
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    /// Role names, including roles inherited through the server's hierarchy.
    #[serde(default)]
    pub roles: Vec<String>,
    /// ISO 8601 creation timestamp, when the endpoint includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn default_is_active() -> bool {
    true
}

/// Credentials posted to `/auth/login/onsubmit`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// New-account payload posted to `/auth/register/onsubmit`.
///
/// The confirmation field never leaves the browser; it is checked by the
/// register form before this value is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
}

/// Body of `/auth/reset-request/onsubmit`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResetRequestData {
    pub email: String,
}

/// Body of `/auth/reset-confirm/onsubmit`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResetConfirmData {
    /// Bearer token from the reset link. Expiry is enforced by the server.
    pub token: String,
    pub new_password: String,
}

/// Error envelope produced by the backend's global exception handler.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// Payload of `GET /dashboard/onload`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardData {
    pub user_stats: UserStats,
    pub system_metrics: SystemMetrics,
}

/// Per-account block of the dashboard snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: i64,
    pub email: String,
    /// ISO 8601 timestamp; rendered as its date part.
    pub account_created: String,
}

/// Coarse system counters shown as dashboard cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub pending_resets: u64,
}
