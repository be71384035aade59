//! Client-side form validation.
//!
//! Each validator returns the request payload when every field passes, or the
//! per-field messages to render under the inputs. Nothing is sent to the
//! server while any message is present.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::net::types::{LoginData, RegisterData};

pub const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").ok());

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Email,
    Password,
    ConfirmPassword,
}

/// Validation messages keyed by field. Empty means the form may submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<Field, &'static str>);

impl FormErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, field: Field, message: Option<&'static str>) {
        if let Some(message) = message {
            self.0.insert(field, message);
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.as_ref().is_some_and(|re| re.is_match(value))
}

fn email_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some("Email is required")
    } else if !is_valid_email(email) {
        Some("Invalid email address")
    } else {
        None
    }
}

fn too_short(password: &str) -> bool {
    password.chars().count() < MIN_PASSWORD_CHARS
}

/// # Errors
///
/// Returns the field messages when either field fails.
pub fn validate_login(email: &str, password: &str) -> Result<LoginData, FormErrors> {
    let mut errors = FormErrors::default();
    errors.set(Field::Email, email_error(email));
    if password.is_empty() {
        errors.set(Field::Password, Some("Password is required"));
    }
    errors.into_result(LoginData {
        email: email.to_owned(),
        password: password.to_owned(),
    })
}

/// # Errors
///
/// Returns the field messages when any field fails, including a confirmation
/// that does not match.
pub fn validate_register(email: &str, password: &str, confirm: &str) -> Result<RegisterData, FormErrors> {
    let mut errors = FormErrors::default();
    errors.set(Field::Email, email_error(email));
    errors.set(
        Field::Password,
        if password.is_empty() {
            Some("Password is required")
        } else if too_short(password) {
            Some("Password must be at least 8 characters")
        } else {
            None
        },
    );
    errors.set(
        Field::ConfirmPassword,
        if confirm.is_empty() {
            Some("Please confirm your password")
        } else if confirm != password {
            Some("Passwords do not match")
        } else {
            None
        },
    );
    errors.into_result(RegisterData {
        email: email.to_owned(),
        password: password.to_owned(),
    })
}

/// Only presence is checked; the server decides what an address is.
///
/// # Errors
///
/// Returns the email message when the field is empty.
pub fn validate_reset_request(email: &str) -> Result<String, FormErrors> {
    let mut errors = FormErrors::default();
    if email.is_empty() {
        errors.set(Field::Email, Some("Email is required"));
    }
    errors.into_result(email.to_owned())
}

/// Returns the new password when both fields pass.
///
/// # Errors
///
/// Returns the field messages when either field fails.
pub fn validate_reset_confirm(new_password: &str, confirm: &str) -> Result<String, FormErrors> {
    let mut errors = FormErrors::default();
    errors.set(
        Field::Password,
        if new_password.is_empty() {
            Some("Password is required")
        } else if too_short(new_password) {
            Some("Min length 8")
        } else {
            None
        },
    );
    errors.set(
        Field::ConfirmPassword,
        if confirm.is_empty() {
            Some("Please confirm")
        } else if confirm != new_password {
            Some("Passwords do not match")
        } else {
            None
        },
    );
    errors.into_result(new_password.to_owned())
}

/// Which half of the reset flow the reset page shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetMode {
    Request,
    Confirm { token: String },
}

impl ResetMode {
    /// Confirm mode needs a non-blank `token` query parameter.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some(token) if !token.is_empty() => Self::Confirm {
                token: token.to_owned(),
            },
            _ => Self::Request,
        }
    }
}
