use super::*;

#[test]
fn classify_auth_failures() {
    assert!(matches!(classify(401, ""), ApiError::Unauthorized));
    assert!(matches!(classify(403, "forbidden"), ApiError::Unauthorized));
}

#[test]
fn classify_not_found() {
    assert!(matches!(classify(404, r#"{"message":"User not found"}"#), ApiError::NotFound));
}

#[test]
fn classify_other_client_errors_keep_server_message() {
    match classify(409, r#"{"message":"email already registered"}"#) {
        ApiError::Rejected { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "email already registered");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[test]
fn classify_plain_text_body_falls_back_to_raw_text() {
    match classify(422, " Failed to deserialize the JSON body \n") {
        ApiError::Rejected { message, .. } => assert_eq!(message, "Failed to deserialize the JSON body"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[test]
fn classify_server_errors_as_transport() {
    assert!(matches!(classify(500, r#"{"message":"Server error"}"#), ApiError::Transport(_)));
    assert!(matches!(classify(502, ""), ApiError::Transport(_)));
    assert!(matches!(classify(503, ""), ApiError::Transport(_)));
}

#[test]
fn endpoint_joins_without_double_slash() {
    assert_eq!(endpoint("http://localhost:3000/", "/api/plans"), "http://localhost:3000/api/plans");
    assert_eq!(endpoint("http://localhost:3000", "/api/plans"), "http://localhost:3000/api/plans");
}

#[test]
fn http_api_trims_base_url() {
    let api = HttpApi::new("http://localhost:3000///").unwrap();
    assert_eq!(api.url("/healthz"), "http://localhost:3000/healthz");
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    // Port 9 (discard) on localhost is closed in test environments.
    let api = HttpApi::new("http://127.0.0.1:9").unwrap();
    let result = api.validate("abc").await;
    assert!(matches!(result, Err(ApiError::Transport(_))), "got {result:?}");
}
