//! Numbox HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use numbox_core::{RentalKind, ServiceType};

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, CreatePaymentIntentRequest, CreatePaymentIntentResponse,
    CreateRentalRequest, CreateVerificationRequest, HealthResponse, ListTransactionsResponse,
    PricingSettingResponse, PurchaseCreditsRequest, PurchaseCreditsResponse, RentalResponse,
    ServiceResponse, UpdatePricingRequest, UserResponse, VerificationResponse,
};

/// Numbox API client.
///
/// Acts on behalf of one authenticated user; every call except
/// [`health`](Self::health) sends the user's bearer token. Pricing updates
/// additionally require an admin key, supplied through [`ClientOptions`].
#[derive(Debug, Clone)]
pub struct NumboxClient {
    client: Client,
    base_url: String,
    bearer_token: String,
    admin_key: Option<String>,
}

impl NumboxClient {
    /// Create a new numbox client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the numbox service (e.g., `"http://numbox:8080"`)
    /// * `bearer_token` - The user's JWT
    #[must_use]
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::with_options(base_url, bearer_token, ClientOptions::default())
    }

    /// Create a new numbox client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
            admin_key: options.admin_key,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.bearer_token)
    }

    /// Check service health. Needs no authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/api/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the authenticated user's profile and balance.
    ///
    /// The account is created on first contact, so this never returns a
    /// not-found error for a valid token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn current_user(&self) -> Result<UserResponse, ClientError> {
        let url = format!("{}/api/auth/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the user's transaction history, newest first.
    ///
    /// The server caps `limit` at 100.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn transactions(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<ListTransactionsResponse, ClientError> {
        let url = format!("{}/api/transactions", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit), ("offset", offset)])
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the active verification catalog, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn services(&self) -> Result<Vec<ServiceResponse>, ClientError> {
        let url = format!("{}/api/services", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get one catalog service by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn service(&self, service_id: &str) -> Result<ServiceResponse, ClientError> {
        let url = format!("{}/api/services/{}", self.base_url, service_id);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Purchase a verification for a catalog service.
    ///
    /// Debits the service's current price from the user's balance and
    /// assigns a phone number that listens for one code.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InsufficientCredits`] if the balance does not
    /// cover the price, or another error if the request fails.
    pub async fn create_verification(
        &self,
        service_id: &str,
    ) -> Result<VerificationResponse, ClientError> {
        let url = format!("{}/api/verifications", self.base_url);
        let request = CreateVerificationRequest {
            service_id: service_id.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", self.bearer())
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the user's verifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn verifications(&self) -> Result<Vec<VerificationResponse>, ClientError> {
        let url = format!("{}/api/verifications", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get one verification by ID. Poll this to pick up the received code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn verification(
        &self,
        verification_id: &str,
    ) -> Result<VerificationResponse, ClientError> {
        let url = format!("{}/api/verifications/{}", self.base_url, verification_id);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Rent a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InsufficientCredits`] if the balance does not
    /// cover the rental price, or another error if the request fails.
    pub async fn create_rental(
        &self,
        kind: RentalKind,
        duration_days: u32,
    ) -> Result<RentalResponse, ClientError> {
        let url = format!("{}/api/rentals", self.base_url);
        let request = CreateRentalRequest {
            kind,
            duration_days,
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", self.bearer())
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the user's rentals, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn rentals(&self) -> Result<Vec<RentalResponse>, ClientError> {
        let url = format!("{}/api/rentals", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get one rental by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn rental(&self, rental_id: &str) -> Result<RentalResponse, ClientError> {
        let url = format!("{}/api/rentals/{}", self.base_url, rental_id);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a Stripe payment intent for a credit package.
    ///
    /// `package_amount` is in whole dollars and must be one of the fixed
    /// packages ($5, $10, $25, $50, $100).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_payment_intent(
        &self,
        package_amount: i64,
    ) -> Result<CreatePaymentIntentResponse, ClientError> {
        let url = format!("{}/api/create-payment-intent", self.base_url);
        let request = CreatePaymentIntentRequest { package_amount };

        let response = self
            .client
            .post(&url)
            .header("authorization", self.bearer())
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Credit a completed payment to the user's balance.
    ///
    /// Call after the payment intent was confirmed on the client side.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DuplicatePayment`] if the intent was already
    /// credited, or another error if the request fails.
    pub async fn purchase_credits(
        &self,
        payment_intent_id: &str,
    ) -> Result<PurchaseCreditsResponse, ClientError> {
        let url = format!("{}/api/credits/purchase", self.base_url);
        let request = PurchaseCreditsRequest {
            payment_intent_id: payment_intent_id.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", self.bearer())
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the current base prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn pricing_settings(&self) -> Result<Vec<PricingSettingResponse>, ClientError> {
        let url = format!("{}/api/settings/pricing", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Update a base price. Requires an admin key.
    ///
    /// The change only affects purchases made after the call; existing
    /// verifications and rentals keep the price they were bought at.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if no admin key was supplied,
    /// or another error if the request fails.
    pub async fn update_pricing(
        &self,
        service_type: ServiceType,
        base_price_dollars: f64,
    ) -> Result<PricingSettingResponse, ClientError> {
        let admin_key = self
            .admin_key
            .as_ref()
            .ok_or_else(|| ClientError::Configuration("no admin key configured".to_string()))?;

        let url = format!(
            "{}/api/settings/pricing/{}",
            self.base_url,
            service_type.as_str()
        );
        let request = UpdatePricingRequest {
            base_price: base_price_dollars,
        };

        let response = self
            .client
            .put(&url)
            .header("x-admin-key", admin_key)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;
                tracing::debug!(code, status = status.as_u16(), "API request failed");

                // Map specific error codes to typed errors
                match code {
                    "insufficient_credits" => {
                        let balance_cents = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("balance_cents"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);
                        let required_cents = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("required_cents"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);

                        Err(ClientError::InsufficientCredits {
                            balance_cents,
                            required_cents,
                        })
                    }
                    "duplicate_payment" => {
                        let payment_intent_id = message
                            .strip_prefix("Payment ")
                            .and_then(|m| m.strip_suffix(" already credited"))
                            .unwrap_or(&message)
                            .to_string();

                        Err(ClientError::DuplicatePayment { payment_intent_id })
                    }
                    "not_found" => Err(ClientError::NotFound(message)),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Admin key for pricing updates (default: none).
    pub admin_key: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            admin_key: None,
        }
    }
}

impl ClientOptions {
    /// Create options with an admin key.
    #[must_use]
    pub fn with_admin_key(key: impl Into<String>) -> Self {
        Self {
            admin_key: Some(key.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn client_creation() {
        let client = NumboxClient::new("http://localhost:8080", "user-jwt");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = NumboxClient::new("http://localhost:8080/", "user-jwt");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_options() {
        let options = ClientOptions::with_admin_key("ops-key");
        let client = NumboxClient::with_options("http://localhost:8080", "user-jwt", options);
        assert_eq!(client.admin_key.as_deref(), Some("ops-key"));
    }

    #[tokio::test]
    async fn fetches_services_with_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/services"))
            .and(header("authorization", "Bearer user-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": "a2f1e9c4-6d3b-4e8a-9c5f-1b2d3e4f5a6b",
                "name": "Google",
                "slug": "google",
                "logo_url": null,
                "category": "Social Media",
                "base_price_cents": 25,
                "price_formatted": "$0.25",
                "is_active": true
            }])))
            .mount(&server)
            .await;

        let client = NumboxClient::new(server.uri(), "user-jwt");
        let services = client.services().await.unwrap();

        assert_eq!(services.len(), 1);
        assert_eq!(services[0].slug, "google");
        assert_eq!(services[0].base_price_cents, 25);
    }

    #[tokio::test]
    async fn parses_verification_timestamps() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/verifications/01HZYQ2V5W8X9J0K1M2N3P4Q5R"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "01HZYQ2V5W8X9J0K1M2N3P4Q5R",
                "service_id": "a2f1e9c4-6d3b-4e8a-9c5f-1b2d3e4f5a6b",
                "phone_number": "+1 (555) 201-3344",
                "status": "completed",
                "code": "482913",
                "price_cents": 25,
                "created_at": "2026-01-05T12:00:00+00:00",
                "expires_at": "2026-01-05T12:05:00+00:00"
            })))
            .mount(&server)
            .await;

        let client = NumboxClient::new(server.uri(), "user-jwt");
        let verification = client
            .verification("01HZYQ2V5W8X9J0K1M2N3P4Q5R")
            .await
            .unwrap();

        assert_eq!(verification.code.as_deref(), Some("482913"));
        assert_eq!(
            verification.expires_at - verification.created_at,
            chrono::Duration::minutes(5)
        );
    }

    #[tokio::test]
    async fn maps_insufficient_credits() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/verifications"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": {
                    "code": "insufficient_credits",
                    "message": "insufficient credits: balance=10, required=25",
                    "details": { "balance_cents": 10, "required_cents": 25 }
                }
            })))
            .mount(&server)
            .await;

        let client = NumboxClient::new(server.uri(), "user-jwt");
        let err = client
            .create_verification("a2f1e9c4-6d3b-4e8a-9c5f-1b2d3e4f5a6b")
            .await
            .unwrap_err();

        match err {
            ClientError::InsufficientCredits {
                balance_cents,
                required_cents,
            } => {
                assert_eq!(balance_cents, 10);
                assert_eq!(required_cents, 25);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_duplicate_payment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/credits/purchase"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": {
                    "code": "duplicate_payment",
                    "message": "Payment pi_abc already credited"
                }
            })))
            .mount(&server)
            .await;

        let client = NumboxClient::new(server.uri(), "user-jwt");
        let err = client.purchase_credits("pi_abc").await.unwrap_err();

        match err {
            ClientError::DuplicatePayment { payment_intent_id } => {
                assert_eq!(payment_intent_id, "pi_abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/rentals/01HZYQ2V5W8X9J0K1M2N3P4Q5R"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": { "code": "not_found", "message": "Rental not found" }
            })))
            .mount(&server)
            .await;

        let client = NumboxClient::new(server.uri(), "user-jwt");
        let err = client
            .rental("01HZYQ2V5W8X9J0K1M2N3P4Q5R")
            .await
            .unwrap_err();

        match err {
            ClientError::NotFound(message) => assert_eq!(message, "Rental not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_pricing_requires_admin_key() {
        let client = NumboxClient::new("http://localhost:8080", "user-jwt");
        let err = client
            .update_pricing(ServiceType::Verification, 0.50)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[tokio::test]
    async fn update_pricing_sends_admin_key() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/settings/pricing/renewable_rental"))
            .and(header("x-admin-key", "ops-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "service_type": "renewable_rental",
                "base_price_cents": 700,
                "price_formatted": "$7.00",
                "description": "Monthly renewable phone number rental",
                "updated_at": "2026-01-05T12:00:00+00:00"
            })))
            .mount(&server)
            .await;

        let client = NumboxClient::with_options(
            server.uri(),
            "user-jwt",
            ClientOptions::with_admin_key("ops-key"),
        );
        let setting = client
            .update_pricing(ServiceType::RenewableRental, 7.00)
            .await
            .unwrap();

        assert_eq!(setting.base_price_cents, 700);
        assert_eq!(setting.service_type, ServiceType::RenewableRental);
    }
}
