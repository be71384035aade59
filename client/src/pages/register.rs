//! Account creation page.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::form::{FieldError, FormAlert, FormSignals, SubmitOutcome};
use crate::query::MutationStatus;
use crate::state::auth::{AuthStore, use_auth};
use crate::state::notice::NoticeState;
use crate::util::guard::LOGIN_PATH;
use crate::util::validation::{Field, validate_register};

pub const REGISTERED_NOTICE: &str = "Account created successfully! Please sign in.";

/// Validates the form and creates the account. The user signs in afterwards.
pub async fn submit_register(store: &AuthStore, email: &str, password: &str, confirm: &str) -> SubmitOutcome {
    let data = match validate_register(email, password, confirm) {
        Ok(data) => data,
        Err(errors) => return SubmitOutcome::Invalid(errors),
    };
    match store.register(data).await {
        Ok(_) => SubmitOutcome::Redirect {
            to: LOGIN_PATH,
            notice: Some(REGISTERED_NOTICE),
        },
        Err(err) => SubmitOutcome::from_error(&err, "Registration failed"),
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let notice = expect_context::<RwSignal<NoticeState>>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let form = FormSignals::new();

    let pending = move || auth.with_store(|s| s.register_state().status == MutationStatus::Pending);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let store = auth.store();
        let values = (email.get_untracked(), password.get_untracked(), confirm.get_untracked());
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let (email_value, password_value, confirm_value) = values;
            let outcome = submit_register(&store, &email_value, &password_value, &confirm_value).await;
            crate::components::form::apply_outcome(outcome, form, notice, &navigate);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (store, values, navigate, notice);
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create Account"</h1>
                <p class="auth-card__subtitle">"Sign up to get started with your account"</p>
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
                    <div class="form-field">
                        <input
                            class="form-input"
                            type="password"
                            placeholder="Password"
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
                        {move || if pending() { "Creating account..." } else { "Create Account" }}
                    </button>
                </form>
                <div class="auth-links">
                    <a href="/auth/login">"Already have an account? Sign in"</a>
                </div>
            </div>
        </div>
    }
}
