use super::*;

#[test]
fn busy_error_is_ignored() {
    assert_eq!(SubmitOutcome::from_error(&ApiError::Busy, "Login failed"), SubmitOutcome::Ignored);
}

#[test]
fn server_message_wins_over_fallback() {
    let err = ApiError::Http {
        status: 409,
        message: "Email already registered".to_owned(),
    };
    assert_eq!(
        SubmitOutcome::from_error(&err, "Registration failed"),
        SubmitOutcome::Failed("Email already registered".to_owned())
    );
}

#[test]
fn transport_errors_use_fallback() {
    assert_eq!(
        SubmitOutcome::from_error(&ApiError::Timeout, "Reset request failed"),
        SubmitOutcome::Failed("Reset request failed".to_owned())
    );
    assert_eq!(
        SubmitOutcome::from_error(&ApiError::Network("offline".to_owned()), "Login failed"),
        SubmitOutcome::Failed("Login failed".to_owned())
    );
}
