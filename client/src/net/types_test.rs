use super::*;

// =============================================================
// User
// =============================================================

#[test]
fn user_deserializes_me_payload() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 7,
        "email": "a@example.com",
        "is_active": true,
        "roles": ["user", "admin"]
    }))
    .unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.roles, vec!["user".to_owned(), "admin".to_owned()]);
    assert_eq!(user.created_at, None);
}

#[test]
fn user_defaults_missing_roles_and_active_flag() {
    // The login endpoint omits `roles`.
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 1,
        "email": "a@example.com"
    }))
    .unwrap();
    assert!(user.is_active);
    assert!(user.roles.is_empty());
}

#[test]
fn user_serialization_omits_absent_created_at() {
    let user = User {
        id: 1,
        email: "a@example.com".to_owned(),
        is_active: true,
        roles: vec![],
        created_at: None,
    };
    let value = serde_json::to_value(&user).unwrap();
    assert!(value.get("created_at").is_none());
}

// =============================================================
// Request bodies
// =============================================================

#[test]
fn reset_confirm_uses_snake_case_password_field() {
    let body = ResetConfirmData {
        token: "tok".to_owned(),
        new_password: "hunter22".to_owned(),
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        serde_json::json!({ "token": "tok", "new_password": "hunter22" })
    );
}

#[test]
fn register_body_has_only_email_and_password() {
    let body = RegisterData {
        email: "a@example.com".to_owned(),
        password: "password1".to_owned(),
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        serde_json::json!({ "email": "a@example.com", "password": "password1" })
    );
}

// =============================================================
// Responses
// =============================================================

#[test]
fn error_body_reads_handler_envelope() {
    let body: ErrorBody = serde_json::from_str(
        r#"{"message":"Invalid credentials","request_id":"r-1","status_code":401}"#,
    )
    .unwrap();
    assert_eq!(body.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(body.status_code, Some(401));
}

#[test]
fn error_body_tolerates_missing_message() {
    let body: ErrorBody = serde_json::from_str(r#"{"detail":"x"}"#).unwrap();
    assert_eq!(body.message, None);
}

#[test]
fn dashboard_data_deserializes_onload_payload() {
    let data: DashboardData = serde_json::from_value(serde_json::json!({
        "user_stats": {
            "user_id": 3,
            "email": "a@example.com",
            "account_created": "2024-05-01T10:00:00"
        },
        "system_metrics": {
            "total_users": 10,
            "active_users": 8,
            "pending_resets": 1
        }
    }))
    .unwrap();
    assert_eq!(data.user_stats.user_id, 3);
    assert_eq!(data.system_metrics.active_users, 8);
}
