//! Telemetry stream handshake and pass-through tests
//!
//! Run with: cargo test -p ownerapi-tests --test streaming_test

use std::time::Duration;

use futures::StreamExt;

use ownerapi_client::testing::TestServer;
use ownerapi_client::{
    OwnerApiClient, OwnerApiError, StreamError, StreamOptions, STREAMING_COLUMNS,
};
use ownerapi_tests::{MockPortal, MOCK_STREAM_BODY, SLOW_STREAM_ROWS, SLOW_STREAM_VEHICLE_ID};

async fn fixture() -> (MockPortal, TestServer, ownerapi_client::OwnerApiClient) {
    let portal = MockPortal::new();
    let server = TestServer::start(portal.router()).await.unwrap();
    let client = server.client().unwrap();
    (portal, server, client)
}

#[tokio::test]
async fn default_request_asks_for_the_canonical_columns() {
    let (portal, _server, client) = fixture().await;

    let options = StreamOptions::new("elon@example.com", "s3cret", 42);
    client.start_streaming(&options).await.unwrap();

    let recorded = portal.recorded_for("/stream/42/");
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].query.as_deref(),
        Some(format!("values={}", STREAMING_COLUMNS.join(",")).as_str())
    );
}

#[tokio::test]
async fn stream_uses_basic_auth_not_the_bearer_token() {
    let (portal, _server, client) = fixture().await;

    let options = StreamOptions::new("elon@example.com", "s3cret", 42);
    client.start_streaming(&options).await.unwrap();

    let recorded = portal.recorded_for("/stream/42/");
    let auth = recorded[0].authorization.as_deref().unwrap();
    assert!(auth.starts_with("Basic "), "got {auth}");
}

#[tokio::test]
async fn explicit_columns_override_the_default() {
    let (portal, _server, client) = fixture().await;

    let options = StreamOptions::new("elon@example.com", "s3cret", 42)
        .with_values(vec!["speed".to_string(), "soc".to_string()]);
    client.start_streaming(&options).await.unwrap();

    let recorded = portal.recorded_for("/stream/42/");
    assert_eq!(recorded[0].query.as_deref(), Some("values=speed,soc"));
}

#[tokio::test]
async fn body_is_handed_through_raw() {
    let (_portal, _server, client) = fixture().await;

    let options = StreamOptions::new("elon@example.com", "s3cret", 42);
    let mut stream = client.start_streaming(&options).await.unwrap();

    let mut received = Vec::new();
    while let Some(chunk) = StreamExt::next(&mut stream).await {
        received.extend_from_slice(&chunk.unwrap());
    }

    // Delimited rows, byte for byte; no JSON parsing, no envelope
    assert_eq!(String::from_utf8(received).unwrap(), MOCK_STREAM_BODY);
}

#[tokio::test]
async fn stream_outlives_the_request_timeout() {
    let portal = MockPortal::new();
    let server = TestServer::start(portal.router()).await.unwrap();

    // A request timeout far shorter than the mock stream's total duration.
    // It bounds REST calls only; the stream must keep yielding until the
    // host closes the connection.
    let client = OwnerApiClient::builder()
        .portal(server.base_url())
        .streaming_portal(format!("{}/stream/", server.base_url()))
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();

    let options = StreamOptions::new("elon@example.com", "s3cret", SLOW_STREAM_VEHICLE_ID);
    let mut stream = client.start_streaming(&options).await.unwrap();

    let mut received = Vec::new();
    while let Some(chunk) = StreamExt::next(&mut stream).await {
        received.extend_from_slice(&chunk.unwrap());
    }

    let expected: String = (0..SLOW_STREAM_ROWS).map(|row| format!("row{}\n", row)).collect();
    assert_eq!(String::from_utf8(received).unwrap(), expected);
}

#[tokio::test]
async fn handshake_failure_surfaces_status_and_message() {
    let (_portal, _server, client) = fixture().await;

    // The mock host knows no vehicle 0
    let options = StreamOptions::new("elon@example.com", "s3cret", 0);
    let err = client.start_streaming(&options).await.unwrap_err();

    match err {
        OwnerApiError::Stream(StreamError::Server { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such vehicle");
        }
        other => panic!("expected Stream(Server) error, got {other:?}"),
    }
}
