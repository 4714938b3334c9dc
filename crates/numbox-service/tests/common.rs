//! Common test utilities for numbox integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use numbox_core::{Service, User, UserId};
use numbox_service::{create_router, seed_store, AppState, ServiceConfig};
use numbox_store::{RocksStore, Store};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct store access for seeding fixtures.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
    /// The admin API key for pricing requests.
    pub admin_api_key: String,
    /// The provider API key for inbound SMS requests.
    pub provider_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh, seeded database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));
        seed_store(store.as_ref()).expect("Failed to seed store");

        let admin_api_key = "test-admin-key".to_string();
        let provider_api_key = "test-provider-key".to_string();

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_base_url: "http://localhost".into(),
            auth_audience: "numbox".into(),
            provider_api_key: Some(provider_api_key.clone()),
            admin_api_key: Some(admin_api_key.clone()),
            stripe_api_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(store.clone(), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            store,
            _temp_dir: temp_dir,
            test_user_id,
            admin_api_key,
            provider_api_key,
        }
    }

    /// Get the authorization header for user authentication.
    pub fn user_auth_header(&self) -> String {
        format!("Bearer test-token:{}", self.test_user_id)
    }

    /// Get a different user's auth header (for testing isolation).
    pub fn other_user_auth_header() -> String {
        let other_user = UserId::generate();
        format!("Bearer test-token:{other_user}")
    }

    /// Create the test user with the given balance.
    pub fn fund_user(&self, balance_cents: i64) {
        let mut user = User::new(self.test_user_id);
        user.balance_cents = balance_cents;
        self.store.put_user(&user).expect("Failed to write user");
    }

    /// Look up a seeded catalog service by slug.
    pub fn service_by_slug(&self, slug: &str) -> Service {
        self.store
            .list_active_services()
            .expect("Failed to list services")
            .into_iter()
            .find(|s| s.slug == slug)
            .unwrap_or_else(|| panic!("service {slug} not seeded"))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
