use super::*;
use axum::http::HeaderValue;

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

// =============================================================================
// bearer_token
// =============================================================================

#[test]
fn bearer_token_extracts_value() {
    let headers = headers_with("Bearer abc123");
    assert_eq!(bearer_token(&headers), Some("abc123"));
}

#[test]
fn bearer_token_scheme_is_case_insensitive() {
    let headers = headers_with("bearer abc123");
    assert_eq!(bearer_token(&headers), Some("abc123"));
}

#[test]
fn bearer_token_missing_header_is_none() {
    assert_eq!(bearer_token(&HeaderMap::new()), None);
}

#[test]
fn bearer_token_empty_value_is_none() {
    assert_eq!(bearer_token(&headers_with("Bearer")), None);
    assert_eq!(bearer_token(&headers_with("Bearer    ")), None);
    assert_eq!(bearer_token(&headers_with("")), None);
}

#[test]
fn bearer_token_other_scheme_is_none() {
    assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
}

// =============================================================================
// account_error_status
// =============================================================================

#[test]
fn validation_errors_are_bad_request() {
    assert_eq!(account_error_status(&AccountError::InvalidName), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_status(&AccountError::InvalidEmail), StatusCode::BAD_REQUEST);
}

#[test]
fn duplicate_email_is_conflict() {
    assert_eq!(account_error_status(&AccountError::EmailTaken), StatusCode::CONFLICT);
}

#[test]
fn bad_credentials_are_unauthorized() {
    assert_eq!(account_error_status(&AccountError::InvalidCredentials), StatusCode::UNAUTHORIZED);
}

#[test]
fn storage_failures_are_server_errors() {
    assert_eq!(
        account_error_status(&AccountError::CorruptRecord("plan".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(account_error_status(&AccountError::Db(sqlx::Error::RowNotFound)), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn auth_response_shape() {
    use crate::services::account::{Subscription, SubscriptionStatus};
    use crate::services::pricing::Plan;

    let response = AuthResponse {
        token: "t".into(),
        user: UserProfile {
            id: uuid::Uuid::nil(),
            name: "Ada".into(),
            email: "a@b.com".into(),
            subscription: Subscription {
                plan: Plan::Starter,
                status: SubscriptionStatus::Trial,
                trial_ends: "2026-01-01T00:00:00Z".into(),
            },
        },
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["token"], "t");
    assert_eq!(json["user"]["name"], "Ada");
    assert_eq!(json["user"]["email"], "a@b.com");
}
