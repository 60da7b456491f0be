//! Token endpoint contract tests
//!
//! Run with: cargo test -p ownerapi-tests --test auth_test

use ownerapi_client::testing::TestServer;
use ownerapi_client::{OwnerApiError, OAUTH_CLIENT_ID, OAUTH_CLIENT_SECRET};
use ownerapi_tests::{MockPortal, MOCK_TOKEN};

#[tokio::test]
async fn login_returns_bearer_token() {
    let portal = MockPortal::new();
    let server = TestServer::start(portal.router()).await.unwrap();
    let client = server.client().unwrap();

    let token = client.login("elon@example.com", "s3cret").await.unwrap();
    assert_eq!(token, MOCK_TOKEN);

    // Exactly one form-encoded POST, with every grant field in order
    let recorded = portal.recorded_for("/oauth/token");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, "POST");
    assert_eq!(
        recorded[0].body,
        format!(
            "grant_type=password&client_id={}&client_secret={}&email=elon%40example.com&password=s3cret",
            OAUTH_CLIENT_ID, OAUTH_CLIENT_SECRET
        )
    );
}

#[tokio::test]
async fn login_failure_carries_raw_status_and_body() {
    let portal = MockPortal::new();
    let server = TestServer::start(portal.router()).await.unwrap();
    let client = server.client().unwrap();

    let err = client
        .login("elon@example.com", "wrong")
        .await
        .expect_err("non-JSON body must not produce a token");

    match err {
        OwnerApiError::Auth { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "unauthorized");
        }
        other => panic!("expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn login_rejects_json_without_access_token() {
    let portal = MockPortal::new();
    let server = TestServer::start(portal.router()).await.unwrap();
    let client = server.client().unwrap();

    let err = client
        .login("notoken@example.com", "s3cret")
        .await
        .expect_err("a body without access_token must not produce a token");

    match err {
        OwnerApiError::Auth { status, body } => {
            assert_eq!(status, 200);
            assert!(body.contains("token_type"));
        }
        other => panic!("expected Auth error, got {other:?}"),
    }
}
