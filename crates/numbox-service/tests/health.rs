//! Health endpoint integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn health_check_returns_json() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "numbox");
}

#[tokio::test]
async fn health_check_needs_no_auth() {
    let harness = TestHarness::new();

    // Every other endpoint rejects this request
    harness
        .server
        .get("/api/transactions")
        .await
        .assert_status_unauthorized();
    harness.server.get("/api/health").await.assert_status_ok();
}
