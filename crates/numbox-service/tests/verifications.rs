//! Verification purchase and lifecycle integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

async fn purchase(harness: &TestHarness, service_id: &str) -> serde_json::Value {
    let response = harness
        .server
        .post("/api/verifications")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "service_id": service_id }))
        .await;

    response.assert_status_ok();
    response.json()
}

async fn balance(harness: &TestHarness) -> i64 {
    let response = harness
        .server
        .get("/api/auth/user")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["balance_cents"].as_i64().unwrap()
}

#[tokio::test]
async fn purchase_debits_balance_and_assigns_number() {
    let harness = TestHarness::new();
    harness.fund_user(100);
    let google = harness.service_by_slug("google");

    let body = purchase(&harness, &google.id.to_string()).await;

    assert_eq!(body["status"], "active");
    assert_eq!(body["price_cents"], 25);
    let number = body["phone_number"].as_str().unwrap();
    assert!(number.starts_with("+1 (555) "));
    assert!(body["code"].is_null());

    assert_eq!(balance(&harness).await, 75);
}

#[tokio::test]
async fn purchase_records_one_deduction_transaction() {
    let harness = TestHarness::new();
    harness.fund_user(100);
    let google = harness.service_by_slug("google");

    purchase(&harness, &google.id.to_string()).await;

    let response = harness
        .server
        .get("/api/transactions")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let transactions = body["transactions"].as_array().unwrap();

    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["type"], "deduction");
    assert_eq!(transactions[0]["amount_cents"], 25);
    assert_eq!(transactions[0]["description"], "Phone verification - Google");
    assert_eq!(transactions[0]["status"], "completed");
}

#[tokio::test]
async fn insufficient_credits_rejected_without_side_effects() {
    let harness = TestHarness::new();
    harness.fund_user(10);
    let google = harness.service_by_slug("google");

    let response = harness
        .server
        .post("/api/verifications")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "service_id": google.id.to_string() }))
        .await;

    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_credits");
    assert_eq!(body["error"]["details"]["balance_cents"], 10);
    assert_eq!(body["error"]["details"]["required_cents"], 25);

    // Balance untouched, nothing listed, no ledger entry
    assert_eq!(balance(&harness).await, 10);

    let response = harness
        .server
        .get("/api/verifications")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let listed: serde_json::Value = response.json();
    assert!(listed.as_array().unwrap().is_empty());

    let response = harness
        .server
        .get("/api/transactions")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_service_not_found() {
    let harness = TestHarness::new();
    harness.fund_user(100);

    let response = harness
        .server
        .post("/api/verifications")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "service_id": numbox_core::ServiceId::generate().to_string() }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn purchase_without_user_record_not_found() {
    let harness = TestHarness::new();
    let google = harness.service_by_slug("google");

    // No fund_user: the caller authenticated but never hit /api/auth/user
    let response = harness
        .server
        .post("/api/verifications")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "service_id": google.id.to_string() }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn list_returns_newest_first() {
    let harness = TestHarness::new();
    harness.fund_user(100);
    let google = harness.service_by_slug("google");
    let tinder = harness.service_by_slug("tinder");

    purchase(&harness, &google.id.to_string()).await;
    // ULID ordering is millisecond-granular
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    purchase(&harness, &tinder.id.to_string()).await;

    let response = harness
        .server
        .get("/api/verifications")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let list = body.as_array().unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["service_id"], tinder.id.to_string());
    assert_eq!(list[1]["service_id"], google.id.to_string());
}

#[tokio::test]
async fn verifications_are_scoped_to_their_owner() {
    let harness = TestHarness::new();
    harness.fund_user(100);
    let google = harness.service_by_slug("google");

    let body = purchase(&harness, &google.id.to_string()).await;
    let id = body["id"].as_str().unwrap();

    // The owner sees it
    harness
        .server
        .get(&format!("/api/verifications/{id}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();

    // Another user gets 404, not 403
    harness
        .server
        .get(&format!("/api/verifications/{id}"))
        .add_header("authorization", TestHarness::other_user_auth_header())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn inbound_sms_completes_verification() {
    let harness = TestHarness::new();
    harness.fund_user(100);
    let google = harness.service_by_slug("google");

    let body = purchase(&harness, &google.id.to_string()).await;
    let id = body["id"].as_str().unwrap();

    let response = harness
        .server
        .post("/api/provider/sms")
        .add_header("x-api-key", harness.provider_api_key.clone())
        .json(&json!({ "verification_id": id, "code": "482913" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["code"], "482913");

    // The owner polls and sees the code
    let response = harness
        .server
        .get(&format!("/api/verifications/{id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "482913");
}

#[tokio::test]
async fn late_code_is_rejected() {
    let harness = TestHarness::new();
    harness.fund_user(100);
    let google = harness.service_by_slug("google");

    let body = purchase(&harness, &google.id.to_string()).await;
    let id = body["id"].as_str().unwrap();

    harness
        .server
        .post("/api/provider/sms")
        .add_header("x-api-key", harness.provider_api_key.clone())
        .json(&json!({ "verification_id": id, "code": "111111" }))
        .await
        .assert_status_ok();

    // A second delivery must not overwrite the first code
    let response = harness
        .server
        .post("/api/provider/sms")
        .add_header("x-api-key", harness.provider_api_key.clone())
        .json(&json!({ "verification_id": id, "code": "222222" }))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    let response = harness
        .server
        .get(&format!("/api/verifications/{id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "111111");
}

#[tokio::test]
async fn inbound_sms_requires_provider_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/provider/sms")
        .json(&json!({
            "verification_id": "01HZYQ2V5W8X9J0K1M2N3P4Q5R",
            "code": "123456"
        }))
        .await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .post("/api/provider/sms")
        .add_header("x-api-key", "wrong-key")
        .json(&json!({
            "verification_id": "01HZYQ2V5W8X9J0K1M2N3P4Q5R",
            "code": "123456"
        }))
        .await;
    response.assert_status_unauthorized();
}
