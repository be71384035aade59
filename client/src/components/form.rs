//! Shared form plumbing for the auth views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each page exposes an async `submit_*` function that validates, calls the
//! auth store, and returns a `SubmitOutcome`. The page component only wires
//! inputs to signals and hands the outcome to `apply_outcome`.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::error::ApiError;
use crate::state::notice::NoticeState;
use crate::util::validation::{Field, FormErrors};

/// Result of one form submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid(FormErrors),
    /// The action succeeded; go to `to`, optionally leaving a notice behind.
    Redirect {
        to: &'static str,
        notice: Option<&'static str>,
    },
    /// The server or transport rejected the action.
    Failed(String),
    /// A previous submission of the same form is still pending.
    Ignored,
}

impl SubmitOutcome {
    /// Maps an action error to the banner text, or `Ignored` for a duplicate.
    pub fn from_error(err: &ApiError, fallback: &str) -> Self {
        if *err == ApiError::Busy {
            return Self::Ignored;
        }
        log::warn!("{fallback}: {err}");
        Self::Failed(err.message_or(fallback))
    }
}

/// Per-form signals touched by an outcome.
#[derive(Clone, Copy)]
pub struct FormSignals {
    pub errors: RwSignal<FormErrors>,
    pub failure: RwSignal<Option<String>>,
}

impl FormSignals {
    pub fn new() -> Self {
        Self {
            errors: RwSignal::new(FormErrors::default()),
            failure: RwSignal::new(None),
        }
    }

    pub fn field(self, field: Field) -> Signal<Option<&'static str>> {
        let errors = self.errors;
        Signal::derive(move || errors.with(|e| e.get(field)))
    }
}

impl Default for FormSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes an outcome back into the form and navigates on success.
pub fn apply_outcome<F>(outcome: SubmitOutcome, form: FormSignals, notice: RwSignal<NoticeState>, navigate: &F)
where
    F: Fn(&str, NavigateOptions),
{
    match outcome {
        SubmitOutcome::Invalid(errors) => {
            form.errors.set(errors);
            form.failure.set(None);
        }
        SubmitOutcome::Redirect { to, notice: message } => {
            form.errors.set(FormErrors::default());
            form.failure.set(None);
            if let Some(message) = message {
                notice.update(|n| n.show(message));
            }
            navigate(to, NavigateOptions::default());
        }
        SubmitOutcome::Failed(message) => {
            form.errors.set(FormErrors::default());
            form.failure.set(Some(message));
        }
        SubmitOutcome::Ignored => {}
    }
}

#[component]
pub fn FieldError(#[prop(into)] message: Signal<Option<&'static str>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <p class="form-field__error">{move || message.get().unwrap_or_default()}</p>
        </Show>
    }
}

#[component]
pub fn FormAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <p class="form-alert form-alert--error">{move || message.get().unwrap_or_default()}</p>
        </Show>
    }
}
