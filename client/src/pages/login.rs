//! Sign-in page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::form::{FieldError, FormAlert, FormSignals, SubmitOutcome};
use crate::query::MutationStatus;
use crate::state::auth::{AuthStore, use_auth};
use crate::state::notice::NoticeState;
use crate::util::guard::DASHBOARD_PATH;
use crate::util::validation::{Field, validate_login};

/// Validates the credentials and signs in.
pub async fn submit_login(store: &AuthStore, email: &str, password: &str) -> SubmitOutcome {
    let data = match validate_login(email, password) {
        Ok(data) => data,
        Err(errors) => return SubmitOutcome::Invalid(errors),
    };
    match store.login(data).await {
        Ok(_) => SubmitOutcome::Redirect {
            to: DASHBOARD_PATH,
            notice: None,
        },
        Err(err) => SubmitOutcome::from_error(&err, "Login failed"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let notice = expect_context::<RwSignal<NoticeState>>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let form = FormSignals::new();
    let flash = RwSignal::new(notice.try_update(NoticeState::take).flatten());

    let pending = move || auth.with_store(|s| s.login_state().status == MutationStatus::Pending);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        flash.set(None);
        let store = auth.store();
        let email_value = email.get_untracked();
        let password_value = password.get_untracked();
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let outcome = submit_login(&store, &email_value, &password_value).await;
            crate::components::form::apply_outcome(outcome, form, notice, &navigate);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (store, email_value, password_value, navigate);
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign In"</h1>
                <p class="auth-card__subtitle">"Enter your credentials to access your account"</p>
                <Show when=move || flash.get().is_some()>
                    <p class="form-alert form-alert--success">{move || flash.get().unwrap_or_default()}</p>
                </Show>
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
                    <FormAlert message=form.failure/>
                    <button class="auth-button" type="submit" disabled=pending>
                        {move || if pending() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <div class="auth-links">
                    <a href="/auth/reset">"Forgot your password?"</a>
                    <a href="/auth/register">"Don't have an account? Sign up"</a>
                </div>
            </div>
        </div>
    }
}
