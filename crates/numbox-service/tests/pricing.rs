//! Pricing settings integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

/// Fetch the pricing list and return the row for the given service type.
async fn pricing_row(harness: &TestHarness, service_type: &str) -> serde_json::Value {
    let response = harness
        .server
        .get("/api/settings/pricing")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let rows: Vec<serde_json::Value> = response.json();
    rows.into_iter()
        .find(|row| row["service_type"] == service_type)
        .unwrap_or_else(|| panic!("no pricing row for {service_type}"))
}

#[tokio::test]
async fn list_returns_seeded_pricing() {
    let harness = TestHarness::new();
    harness.fund_user(0);

    let response = harness
        .server
        .get("/api/settings/pricing")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let rows: Vec<serde_json::Value> = response.json();
    assert_eq!(rows.len(), 3);

    let verification = pricing_row(&harness, "verification").await;
    assert_eq!(verification["base_price_cents"], 25);
    assert_eq!(verification["price_formatted"], "$0.25");

    let non_renewable = pricing_row(&harness, "non_renewable_rental").await;
    assert_eq!(non_renewable["base_price_cents"], 150);

    let renewable = pricing_row(&harness, "renewable_rental").await;
    assert_eq!(renewable["base_price_cents"], 500);
}

#[tokio::test]
async fn list_requires_user_auth() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/settings/pricing").await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Admin updates
// ============================================================================

#[tokio::test]
async fn update_requires_admin_key() {
    let harness = TestHarness::new();

    // No key at all
    let response = harness
        .server
        .put("/api/settings/pricing/verification")
        .json(&json!({ "base_price": 0.50 }))
        .await;
    response.assert_status_unauthorized();

    // Wrong key
    let response = harness
        .server
        .put("/api/settings/pricing/verification")
        .add_header("x-admin-key", "wrong-key")
        .json(&json!({ "base_price": 0.50 }))
        .await;
    response.assert_status_unauthorized();

    // A user token is not an admin key
    let response = harness
        .server
        .put("/api/settings/pricing/verification")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "base_price": 0.50 }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn admin_updates_base_price() {
    let harness = TestHarness::new();
    harness.fund_user(0);

    let response = harness
        .server
        .put("/api/settings/pricing/renewable_rental")
        .add_header("x-admin-key", harness.admin_api_key.clone())
        .json(&json!({ "base_price": 7.00 }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["service_type"], "renewable_rental");
    assert_eq!(body["base_price_cents"], 700);
    assert_eq!(body["price_formatted"], "$7.00");

    // The change is visible on the public listing
    let row = pricing_row(&harness, "renewable_rental").await;
    assert_eq!(row["base_price_cents"], 700);
}

#[tokio::test]
async fn unknown_service_type_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .put("/api/settings/pricing/priority_mail")
        .add_header("x-admin-key", harness.admin_api_key.clone())
        .json(&json!({ "base_price": 1.00 }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn non_positive_price_rejected() {
    let harness = TestHarness::new();
    harness.fund_user(0);

    for price in [0.0, -2.50] {
        let response = harness
            .server
            .put("/api/settings/pricing/verification")
            .add_header("x-admin-key", harness.admin_api_key.clone())
            .json(&json!({ "base_price": price }))
            .await;

        response.assert_status_bad_request();
    }

    // Price is unchanged
    let row = pricing_row(&harness, "verification").await;
    assert_eq!(row["base_price_cents"], 25);
}

// ============================================================================
// Price snapshots
// ============================================================================

#[tokio::test]
async fn price_change_applies_to_later_purchases_only() {
    let harness = TestHarness::new();
    harness.fund_user(2000);

    let rent = |auth: String| {
        harness
            .server
            .post("/api/rentals")
            .add_header("authorization", auth)
            .json(&json!({ "type": "renewable", "duration_days": 30 }))
    };

    let response = rent(harness.user_auth_header()).await;
    response.assert_status_ok();
    let before: serde_json::Value = response.json();
    assert_eq!(before["price_cents"], 500);

    harness
        .server
        .put("/api/settings/pricing/renewable_rental")
        .add_header("x-admin-key", harness.admin_api_key.clone())
        .json(&json!({ "base_price": 7.00 }))
        .await
        .assert_status_ok();

    let response = rent(harness.user_auth_header()).await;
    response.assert_status_ok();
    let after: serde_json::Value = response.json();
    assert_eq!(after["price_cents"], 700);

    // The earlier rental keeps the price it was bought at
    let response = harness
        .server
        .get(&format!("/api/rentals/{}", before["id"].as_str().unwrap()))
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let refetched: serde_json::Value = response.json();
    assert_eq!(refetched["price_cents"], 500);

    // Both debits landed: 2000 - 500 - 700
    let response = harness
        .server
        .get("/api/auth/user")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let user: serde_json::Value = response.json();
    assert_eq!(user["balance_cents"], 800);
}
