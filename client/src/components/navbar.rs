//! Top navigation bar, shown only while signed in.

#[cfg(test)]
#[path = "navbar_test.rs"]
mod navbar_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::error::ApiError;
use crate::query::MutationStatus;
use crate::state::auth::{AuthStore, use_auth};
use crate::util::guard::LOGIN_PATH;

/// Signs out and returns where to go next, or `None` to stay put.
pub async fn sign_out(store: &AuthStore) -> Option<&'static str> {
    match store.logout().await {
        Ok(()) => Some(LOGIN_PATH),
        Err(ApiError::Busy) => None,
        Err(err) => {
            log::error!("logout failed: {err}");
            None
        }
    }
}

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let email = move || auth.user().map(|u| u.email).unwrap_or_default();

    view! {
        <Show when=move || auth.is_authenticated()>
            <nav class="navbar">
                <a class="navbar__brand" href="/">"Gatehouse"</a>
                <div class="navbar__links">
                    <a class="navbar__link" href="/dashboard">"Dashboard"</a>
                    <span class="navbar__user">{email}</span>
                    <SignOutButton/>
                </div>
            </nav>
        </Show>
    }
}

#[component]
fn SignOutButton() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let signing_out = move || auth.with_store(|s| s.logout_state().status == MutationStatus::Pending);

    let on_click = move |_| {
        let store = auth.store();
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Some(to) = sign_out(&store).await {
                navigate(to, leptos_router::NavigateOptions::default());
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (store, navigate);
    };

    view! {
        <button class="navbar__sign-out" on:click=on_click disabled=signing_out>
            {move || if signing_out() { "Signing out..." } else { "Sign out" }}
        </button>
    }
}
