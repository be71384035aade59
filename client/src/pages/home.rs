//! Landing page.

use leptos::prelude::*;

use crate::state::auth::use_auth;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let email = move || auth.user().map(|u| u.email).unwrap_or_default();

    view! {
        <div class="home-page">
            <h1>"Gatehouse"</h1>
            <p class="home-page__subtitle">"Sign in to manage your account."</p>
            <Show
                when=move || auth.is_authenticated()
                fallback=|| {
                    view! {
                        <div class="home-page__actions">
                            <a class="auth-button" href="/auth/login">"Sign In"</a>
                            <a class="auth-button auth-button--secondary" href="/auth/register">"Sign Up"</a>
                        </div>
                    }
                }
            >
                <p class="home-page__welcome">"Welcome back, " {email} "!"</p>
                <div class="home-page__actions">
                    <a class="auth-button" href="/dashboard">"Go to Dashboard"</a>
                </div>
            </Show>
        </div>
    }
}
