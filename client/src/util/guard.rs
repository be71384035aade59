//! Pre-navigation route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `components::route_guard` calls `check` whenever the location changes and
//! replaces the history entry when the decision is a redirect. The decision
//! itself (`decide`) is pure so the table can be tested without a router.
//!
//! ERROR HANDLING
//! ==============
//! Every failure to read the session counts as "no user". A 401 is the
//! normal signed-out case; anything else is logged at `warn`.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::net::types::User;
use crate::state::auth::AuthStore;
use crate::util::permissions::{has_permission, required_role};

pub const LOGIN_PATH: &str = "/auth/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
const HOME_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

fn is_public(path: &str) -> bool {
    path == "/auth" || path.starts_with("/auth/")
}

/// Decides whether `path` may render for `user`.
pub fn decide(path: &str, user: Option<&User>) -> GuardDecision {
    let Some(user) = user else {
        return if is_public(path) {
            GuardDecision::Proceed
        } else {
            GuardDecision::Redirect(LOGIN_PATH)
        };
    };

    match required_role(path) {
        Some(role) if !has_permission(&user.roles, role) => {
            // A user without even the base role cannot land on the dashboard
            // either; send them home instead of bouncing forever.
            if path.starts_with(DASHBOARD_PATH) {
                GuardDecision::Redirect(HOME_PATH)
            } else {
                GuardDecision::Redirect(DASHBOARD_PATH)
            }
        }
        _ => GuardDecision::Proceed,
    }
}

/// Reads the session from the server and returns the current user, if any.
///
/// Success seeds the `["user"]` cache entry. A 401 clears the whole cache:
/// the server no longer honours the session, and nothing cached under it may
/// be shown to whoever signs in next.
pub async fn resolve_session(store: &AuthStore) -> Option<User> {
    match store.refresh_user().await {
        Ok(user) => Some(user),
        Err(err) => {
            if err.is_unauthorized() {
                store.queries().clear();
            } else {
                log::warn!("session check failed: {err}");
            }
            None
        }
    }
}

/// Fetches the session and decides the navigation to `path`.
pub async fn check(store: &AuthStore, path: &str) -> GuardDecision {
    let user = resolve_session(store).await;
    let decision = decide(path, user.as_ref());
    if let GuardDecision::Redirect(target) = decision {
        log::debug!("guard redirect {path} -> {target}");
    }
    decision
}
