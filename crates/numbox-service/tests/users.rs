//! User account integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn first_contact_creates_user_with_zero_balance() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/auth/user")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], harness.test_user_id.to_string());
    assert_eq!(body["balance_cents"], 0);
    assert_eq!(body["balance_formatted"], "$0.00");
}

#[tokio::test]
async fn repeat_contact_returns_same_user() {
    let harness = TestHarness::new();
    harness.fund_user(500);

    let response = harness
        .server
        .get("/api/auth/user")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    // The existing record is returned, not a fresh zero-balance one
    assert_eq!(body["balance_cents"], 500);
}

#[tokio::test]
async fn user_endpoint_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/auth/user").await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn malformed_bearer_token_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/auth/user")
        .add_header("authorization", "Bearer test-token:not-a-uuid")
        .await;

    response.assert_status_unauthorized();
}
