//! Callable endpoint tests
//!
//! Drives the router end to end with a stub provider.

mod common;

use axum::http::StatusCode;
use common::{get_text, post_json, post_raw, test_router, ProviderBehavior};
use pretty_assertions::assert_eq;
use rstest::rstest;
use scrapitdown_mailer::config::MailConfig;
use scrapitdown_mailer::domain::{DirectAccountConfig, TransportStrategy};
use serde_json::json;

fn gmail_config() -> MailConfig {
    MailConfig {
        direct_account: DirectAccountConfig {
            email: Some("sender@gmail.com".to_string()),
            password: Some("app-password".to_string()),
        },
        ..MailConfig::default()
    }
}

// ============================================================================
// sendVerificationEmail
// ============================================================================

#[tokio::test]
async fn test_send_verification_email_success() {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("m1"));

    let (status, body) = post_json(
        &app,
        "/sendVerificationEmail",
        &json!({"data": {"email": "user@example.com", "code": "123456"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": {"success": true, "messageId": "m1"}}));

    let sent = calls.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to[0].email, "user@example.com");
    assert_eq!(sent[0].from.email, "sender@gmail.com");
    assert_eq!(sent[0].subject, "Scrap It Down - Email Verification Code");
    assert!(sent[0].html_body.contains("123456"));
    assert!(sent[0]
        .text_body
        .as_deref()
        .unwrap()
        .contains("Your Scrap It Down verification code is: 123456"));
}

#[rstest]
#[case::missing_code(json!({"data": {"email": "user@example.com"}}))]
#[case::missing_email(json!({"data": {"code": "123456"}}))]
#[case::empty_email(json!({"data": {"email": "", "code": "123456"}}))]
#[case::empty_code(json!({"data": {"email": "user@example.com", "code": ""}}))]
#[case::null_code(json!({"data": {"email": "user@example.com", "code": null}}))]
#[case::zero_code(json!({"data": {"email": "user@example.com", "code": 0}}))]
#[case::no_data(json!({}))]
#[case::null_data(json!({"data": null}))]
#[tokio::test]
async fn test_send_verification_email_rejects_missing_fields(#[case] payload: serde_json::Value) {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("m1"));

    let (status, body) = post_json(&app, "/sendVerificationEmail", &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": {"status": "INVALID_ARGUMENT", "message": "Missing email or code"}})
    );
    assert_eq!(calls.resolve_count(), 0);
    assert!(calls.sent_messages().is_empty());
}

#[tokio::test]
async fn test_send_verification_email_provider_failure_is_internal() {
    let (app, calls) = test_router(
        gmail_config(),
        ProviderBehavior::Reject("535 5.7.8 Username and Password not accepted"),
    );

    let (status, body) = post_json(
        &app,
        "/sendVerificationEmail",
        &json!({"data": {"email": "user@example.com", "code": "123456"}}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": {"status": "INTERNAL", "message": "Failed to send verification email"}})
    );
    assert!(!body.to_string().contains("Username and Password"));
    assert_eq!(calls.sent_messages().len(), 1);
}

#[tokio::test]
async fn test_send_verification_email_numeric_code() {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("m2"));

    let (status, _) = post_json(
        &app,
        "/sendVerificationEmail",
        &json!({"data": {"email": "user@example.com", "code": 654321}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(calls.sent_messages()[0].html_body.contains("654321"));
}

#[tokio::test]
async fn test_send_verification_email_uses_configured_strategy() {
    let config = MailConfig {
        strategy: TransportStrategy::ApiRelay,
        ..gmail_config()
    };
    let (app, calls) = test_router(config, ProviderBehavior::Accept("m3"));

    let (status, _) = post_json(
        &app,
        "/sendVerificationEmail",
        &json!({"data": {"email": "user@example.com", "code": "111111"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        *calls.strategies.lock().unwrap(),
        vec![TransportStrategy::ApiRelay]
    );
}

#[tokio::test]
async fn test_transport_resolved_per_call() {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("m1"));
    let payload = json!({"data": {"email": "user@example.com", "code": "123456"}});

    post_json(&app, "/sendVerificationEmail", &payload).await;
    post_json(&app, "/sendVerificationEmail", &payload).await;

    assert_eq!(calls.resolve_count(), 2);
}

#[tokio::test]
async fn test_send_verification_email_malformed_json() {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("m1"));

    let (status, body) = post_raw(&app, "/sendVerificationEmail", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    assert_eq!(calls.resolve_count(), 0);
}

#[tokio::test]
async fn test_send_verification_email_wrong_field_type() {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("m1"));

    let (status, body) = post_json(
        &app,
        "/sendVerificationEmail",
        &json!({"data": {"email": ["user@example.com"], "code": "123456"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    assert_eq!(calls.resolve_count(), 0);
}

// ============================================================================
// testSendEmail
// ============================================================================

#[tokio::test]
async fn test_send_email_configured() {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("unused"));

    let (status, body) = post_json(
        &app,
        "/testSendEmail",
        &json!({"data": {"email": "ops@example.com"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"result": {"success": true, "message": "Email service is configured correctly"}})
    );
    assert_eq!(calls.verify_count(), 1);
    assert!(calls.sent_messages().is_empty());
}

#[rstest]
#[case::missing(json!({"data": {}}))]
#[case::empty(json!({"data": {"email": ""}}))]
#[case::no_data(json!({}))]
#[tokio::test]
async fn test_send_email_rejects_missing_email(#[case] payload: serde_json::Value) {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("unused"));

    let (status, body) = post_json(&app, "/testSendEmail", &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": {"status": "INVALID_ARGUMENT", "message": "Missing email"}})
    );
    assert_eq!(calls.verify_count(), 0);
}

#[tokio::test]
async fn test_send_email_verify_failure_is_internal() {
    let (app, calls) = test_router(
        MailConfig::default(),
        ProviderBehavior::Reject("535 authentication failed"),
    );

    let (status, body) = post_json(
        &app,
        "/testSendEmail",
        &json!({"data": {"email": "ops@example.com"}}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": {"status": "INTERNAL", "message": "Email service is not configured correctly"}})
    );
    assert_eq!(calls.verify_count(), 1);
    assert!(calls.sent_messages().is_empty());
}

// ============================================================================
// Health and readiness
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_router(MailConfig::default(), ProviderBehavior::Accept("m1"));

    let (status, body) = get_text(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));
}

#[tokio::test]
async fn test_ready_with_credentials() {
    let (app, calls) = test_router(gmail_config(), ProviderBehavior::Accept("m1"));

    let (status, body) = get_text(&app, "/ready").await;
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ready", "strategy": "direct_account", "missingCredentials": []})
    );
    assert_eq!(calls.resolve_count(), 0);
}

#[tokio::test]
async fn test_ready_reports_missing_relay_key() {
    let config = MailConfig {
        strategy: TransportStrategy::ApiRelay,
        ..gmail_config()
    };
    let (app, _) = test_router(config, ProviderBehavior::Accept("m1"));

    let (status, body) = get_text(&app, "/ready").await;
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["missingCredentials"], json!(["SENDGRID_API_KEY"]));
}
