//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthStore` is the plain-Rust facade: it reads the cached `["user"]` query
//! and runs the login/register/logout/reset mutations against `net::api`.
//! `AuthContext` wraps it for Leptos and turns cache notifications into a
//! revision signal so views re-render when the session changes.
//!
//! Cache policy: login success clears the cache and writes the returned user;
//! register leaves the cache alone; logout success and an expired session
//! both clear every key, so no data from the previous session survives a
//! user switch.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{LoginData, RegisterData, User};
use crate::query::{Mutation, MutationState, QueryClient, QueryKey, QueryOptions, RetryPolicy};

/// Session facade over the query cache and the auth endpoints.
#[derive(Clone)]
pub struct AuthStore {
    api: ApiClient,
    queries: QueryClient,
    login: Mutation<User>,
    register: Mutation<User>,
    logout: Mutation<()>,
    reset_request: Mutation<()>,
    reset_confirm: Mutation<()>,
}

impl AuthStore {
    pub fn new(api: ApiClient, queries: QueryClient) -> Self {
        let notifier = queries.notifier().clone();
        Self {
            api,
            login: Mutation::new(notifier.clone()),
            register: Mutation::new(notifier.clone()),
            logout: Mutation::new(notifier.clone()),
            reset_request: Mutation::new(notifier.clone()),
            reset_confirm: Mutation::new(notifier),
            queries,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    /// Cached current user, if any.
    pub fn user(&self) -> Option<User> {
        self.queries.get_query_data(&QueryKey::current_user())
    }

    /// True when the user entry holds data and its last fetch succeeded.
    pub fn is_authenticated(&self) -> bool {
        let state = self.queries.query_state(&QueryKey::current_user());
        state.has_data && state.error.is_none()
    }

    /// Re-reads the session from `/auth/me` into the `["user"]` entry.
    ///
    /// Always goes to the network and is never retried. Concurrent calls
    /// share one request.
    ///
    /// # Errors
    ///
    /// Returns the `/auth/me` failure; 401 means there is no session.
    pub async fn refresh_user(&self) -> Result<User, ApiError> {
        let api = self.api.clone();
        let options = QueryOptions::default()
            .with_retry(RetryPolicy::never())
            .with_stale_time(0.0);
        self.queries
            .fetch_query(QueryKey::current_user(), options, move || {
                let api = api.clone();
                async move { api.current_user().await }
            })
            .await
    }

    /// Signs in and stores the returned user as the current user. Anything
    /// cached for a previous session is dropped first.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection, a transport error, or `Busy` when a
    /// login is already pending.
    pub async fn login(&self, data: LoginData) -> Result<User, ApiError> {
        let api = self.api.clone();
        let queries = self.queries.clone();
        self.login
            .run(async move {
                let user = api.login(&data).await?;
                queries.clear();
                queries.set_query_data(&QueryKey::current_user(), &user);
                Ok(user)
            })
            .await
    }

    /// Creates an account. The new user still has to sign in.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection, a transport error, or `Busy`.
    pub async fn register(&self, data: RegisterData) -> Result<User, ApiError> {
        let api = self.api.clone();
        self.register.run(async move { api.register(&data).await }).await
    }

    /// Ends the session and drops every cached query.
    ///
    /// # Errors
    ///
    /// Returns a transport error (the cache is left intact) or `Busy`.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let api = self.api.clone();
        let queries = self.queries.clone();
        self.logout
            .run(async move {
                api.logout().await?;
                queries.clear();
                Ok(())
            })
            .await
    }

    /// Asks the server to email a reset link.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection, a transport error, or `Busy`.
    pub async fn request_password_reset(&self, email: String) -> Result<(), ApiError> {
        let api = self.api.clone();
        self.reset_request
            .run(async move { api.reset_request(&email).await })
            .await
    }

    /// Sets a new password using the token from a reset link.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection (e.g. an expired token), a transport
    /// error, or `Busy`.
    pub async fn confirm_password_reset(&self, token: String, new_password: String) -> Result<(), ApiError> {
        let api = self.api.clone();
        self.reset_confirm
            .run(async move { api.reset_confirm(&token, &new_password).await })
            .await
    }

    pub fn login_state(&self) -> MutationState<User> {
        self.login.state()
    }

    pub fn register_state(&self) -> MutationState<User> {
        self.register.state()
    }

    pub fn logout_state(&self) -> MutationState<()> {
        self.logout.state()
    }

    pub fn reset_request_state(&self) -> MutationState<()> {
        self.reset_request.state()
    }

    pub fn reset_confirm_state(&self) -> MutationState<()> {
        self.reset_confirm.state()
    }
}

/// Leptos handle to the shared `AuthStore`.
///
/// Reads through the accessor methods are reactive: they track a revision
/// signal bumped on every cache write and mutation transition.
#[derive(Clone, Copy)]
pub struct AuthContext {
    store: StoredValue<AuthStore, LocalStorage>,
    revision: RwSignal<u64>,
}

impl AuthContext {
    pub fn new(store: AuthStore) -> Self {
        let revision = RwSignal::new(0_u64);
        store.queries().notifier().subscribe(move || {
            revision.try_update(|r| *r += 1);
        });
        Self {
            store: StoredValue::new_local(store),
            revision,
        }
    }

    /// Untracked clone of the store for async work.
    pub fn store(&self) -> AuthStore {
        self.store.get_value()
    }

    pub fn user(&self) -> Option<User> {
        self.revision.track();
        self.store.with_value(AuthStore::user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.revision.track();
        self.store.with_value(AuthStore::is_authenticated)
    }

    /// Tracked read of any store state, e.g. a mutation's pending flag.
    pub fn with_store<R>(&self, f: impl FnOnce(&AuthStore) -> R) -> R {
        self.revision.track();
        self.store.with_value(f)
    }
}

/// Builds the store for this build target and provides it as context.
pub fn provide_auth(store: AuthStore) -> AuthContext {
    let auth = AuthContext::new(store);
    provide_context(auth);
    auth
}

/// Returns the auth context provided by `App`.
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
