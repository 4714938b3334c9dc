//! Service catalog integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn list_services_returns_seeded_catalog() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/services")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let services = body.as_array().unwrap();
    assert_eq!(services.len(), 20);

    // Ordered by name
    assert_eq!(services[0]["name"], "Airbnb");
    assert_eq!(services[1]["name"], "Amazon");
}

#[tokio::test]
async fn get_service_by_id() {
    let harness = TestHarness::new();
    let google = harness.service_by_slug("google");

    let response = harness
        .server
        .get(&format!("/api/services/{}", google.id))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["slug"], "google");
    assert_eq!(body["base_price_cents"], 25);
    assert_eq!(body["price_formatted"], "$0.25");
}

#[tokio::test]
async fn get_unknown_service_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get(&format!(
            "/api/services/{}",
            numbox_core::ServiceId::generate()
        ))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn services_require_auth() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/api/services")
        .await
        .assert_status_unauthorized();
}
