//! Password reset page.
//!
//! Without a `token` query parameter the page asks for an email and requests
//! a reset link. With one it asks for the new password and confirms the reset.
//! Both paths end on the sign-in page with a notice.

#[cfg(test)]
#[path = "reset_test.rs"]
mod reset_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::components::form::{FieldError, FormAlert, FormSignals, SubmitOutcome};
use crate::query::MutationStatus;
use crate::state::auth::{AuthStore, use_auth};
use crate::state::notice::NoticeState;
use crate::util::guard::LOGIN_PATH;
use crate::util::validation::{Field, ResetMode, validate_reset_confirm, validate_reset_request};

pub const RESET_REQUESTED_NOTICE: &str = "If an account exists, a reset email has been sent.";
pub const RESET_DONE_NOTICE: &str = "Password has been reset. Please sign in.";

/// Requests a reset link for `email`.
pub async fn submit_reset_request(store: &AuthStore, email: &str) -> SubmitOutcome {
    let email = match validate_reset_request(email) {
        Ok(email) => email,
        Err(errors) => return SubmitOutcome::Invalid(errors),
    };
    match store.request_password_reset(email).await {
        Ok(()) => SubmitOutcome::Redirect {
            to: LOGIN_PATH,
            notice: Some(RESET_REQUESTED_NOTICE),
        },
        Err(err) => SubmitOutcome::from_error(&err, "Reset request failed"),
    }
}

/// Sets the new password for the reset `token`.
pub async fn submit_reset_confirm(store: &AuthStore, token: &str, new_password: &str, confirm: &str) -> SubmitOutcome {
    let new_password = match validate_reset_confirm(new_password, confirm) {
        Ok(password) => password,
        Err(errors) => return SubmitOutcome::Invalid(errors),
    };
    match store.confirm_password_reset(token.to_owned(), new_password).await {
        Ok(()) => SubmitOutcome::Redirect {
            to: LOGIN_PATH,
            notice: Some(RESET_DONE_NOTICE),
        },
        Err(err) => SubmitOutcome::from_error(&err, "Password reset failed"),
    }
}

#[component]
pub fn ResetPage() -> impl IntoView {
    let query = use_query_map();
    let mode = Memo::new(move |_| ResetMode::from_token(query.with(|q| q.get("token")).as_deref()));

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Password Reset"</h1>
                {move || match mode.get() {
                    ResetMode::Request => view! { <RequestForm/> }.into_any(),
                    ResetMode::Confirm { token } => view! { <ConfirmForm token=token/> }.into_any(),
                }}
                <div class="auth-links">
                    <a href="/auth/login">"Back to Sign In"</a>
                </div>
            </div>
        </div>
    }
}

#[component]
fn RequestForm() -> impl IntoView {
    let auth = use_auth();
    let notice = expect_context::<RwSignal<NoticeState>>();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let form = FormSignals::new();

    let pending = move || auth.with_store(|s| s.reset_request_state().status == MutationStatus::Pending);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let store = auth.store();
        let email_value = email.get_untracked();
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let outcome = submit_reset_request(&store, &email_value).await;
            crate::components::form::apply_outcome(outcome, form, notice, &navigate);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (store, email_value, navigate, notice);
    };

    view! {
        <p class="auth-card__subtitle">"Request a password reset link"</p>
        <form class="auth-form" on:submit=on_submit novalidate=true>
            <div class="form-field">
                <input
                    class="form-input"
                    type="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <FieldError message=form.field(Field::Email)/>
            </div>
            <FormAlert message=form.failure/>
            <button class="auth-button" type="submit" disabled=pending>
                {move || if pending() { "Sending..." } else { "Send Reset Link" }}
            </button>
        </form>
    }
}

#[component]
fn ConfirmForm(token: String) -> impl IntoView {
    let auth = use_auth();
    let notice = expect_context::<RwSignal<NoticeState>>();
    let navigate = use_navigate();
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let form = FormSignals::new();
    let token = StoredValue::new(token);

    let pending = move || auth.with_store(|s| s.reset_confirm_state().status == MutationStatus::Pending);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let store = auth.store();
        let values = (token.get_value(), password.get_untracked(), confirm.get_untracked());
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let (token_value, password_value, confirm_value) = values;
            let outcome = submit_reset_confirm(&store, &token_value, &password_value, &confirm_value).await;
            crate::components::form::apply_outcome(outcome, form, notice, &navigate);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (store, values, navigate, notice);
    };

    view! {
        <p class="auth-card__subtitle">"Enter a new password for your account"</p>
        <form class="auth-form" on:submit=on_submit novalidate=true>
            <div class="form-field">
                <input
                    class="form-input"
                    type="password"
                    placeholder="New Password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <FieldError message=form.field(Field::Password)/>
            </div>
            <div class="form-field">
                <input
                    class="form-input"
                    type="password"
                    placeholder="Confirm Password"
                    prop:value=move || confirm.get()
                    on:input=move |ev| confirm.set(event_target_value(&ev))
                />
                <FieldError message=form.field(Field::ConfirmPassword)/>
            </div>
            <FormAlert message=form.failure/>
            <button class="auth-button" type="submit" disabled=pending>
                {move || if pending() { "Updating..." } else { "Reset Password" }}
            </button>
        </form>
    }
}
