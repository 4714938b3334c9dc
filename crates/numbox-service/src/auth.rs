//! Authentication extractors.
//!
//! Three ways into the API:
//! - `AuthUser` - end-user JWTs, validated against the identity provider's JWKS
//! - `ProviderAuth` - the SMS provider's `X-API-Key`, for inbound code delivery
//! - `AdminAuth` - the `X-Admin-Key`, for pricing management

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use numbox_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Signing keys are refreshed from the JWKS endpoint after this long.
const KEY_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Timeout for JWKS fetches.
const JWKS_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Read a header value as a string, if present and valid UTF-8.
fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

/// An authenticated end user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
    /// The raw subject claim from the JWT.
    pub subject: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = header_str(parts, "authorization")
                .and_then(|h| h.strip_prefix("Bearer "))
                .ok_or(ApiError::Unauthorized)?;

            // Test tokens carry the user ID directly. The bypass only exists
            // in test builds; release builds always hit JWT validation.
            #[cfg(any(test, feature = "test-auth"))]
            if let Some(raw_id) = token.strip_prefix("test-token:") {
                let user_id = raw_id
                    .parse::<UserId>()
                    .map_err(|_| ApiError::Unauthorized)?;

                return Ok(AuthUser {
                    user_id,
                    subject: raw_id.to_string(),
                });
            }

            let claims = validate_jwt(token, state).await?;

            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(AuthUser {
                user_id,
                subject: claims.sub,
            })
        })
    }
}

/// SMS-provider authentication via API key.
///
/// Used by the upstream number provider to deliver inbound verification codes.
#[derive(Debug, Clone)]
pub struct ProviderAuth {
    /// The provider name or identifier.
    pub provider_name: String,
}

impl FromRequestParts<Arc<AppState>> for ProviderAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let presented = header_str(parts, "x-api-key").ok_or(ApiError::Unauthorized)?;

            // A service with no provider key configured accepts no deliveries.
            let expected = state
                .config
                .provider_api_key
                .as_deref()
                .ok_or(ApiError::Unauthorized)?;

            if presented != expected {
                return Err(ApiError::Unauthorized);
            }

            let provider_name = header_str(parts, "x-provider-name")
                .unwrap_or("unknown")
                .to_string();

            Ok(ProviderAuth { provider_name })
        })
    }
}

/// Admin authentication via API key.
///
/// Used for admin-only endpoints like updating pricing.
/// Requires the `X-Admin-Key` header to match the configured admin key.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Admin identifier (for audit logging).
    pub admin_id: String,
}

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let presented = header_str(parts, "x-admin-key").ok_or(ApiError::Unauthorized)?;

            let expected = state
                .config
                .admin_api_key
                .as_deref()
                .ok_or(ApiError::Unauthorized)?;

            if presented != expected {
                return Err(ApiError::Unauthorized);
            }

            let admin_id = header_str(parts, "x-admin-id")
                .unwrap_or("admin")
                .to_string();

            tracing::info!(admin_id = %admin_id, "Admin authenticated");

            Ok(AdminAuth { admin_id })
        })
    }
}

// ============================================================================
// JWKS Client and JWT Validation
// ============================================================================

/// JWT claims for identity-provider tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Audience; providers emit either a string or an array.
    #[serde(default)]
    pub aud: Option<serde_json::Value>,
    /// Issuer.
    pub iss: String,
    /// Expiration time (Unix seconds).
    pub exp: i64,
    /// Issued at (Unix seconds).
    pub iat: i64,
}

/// JWKS document served at `/.well-known/jwks.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    /// The published signing keys.
    pub keys: Vec<Jwk>,
}

/// A single published signing key.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type; only `"RSA"` keys are used.
    pub kty: String,
    /// Key ID, matched against the JWT header.
    pub kid: Option<String>,
    /// RSA modulus (base64url).
    pub n: Option<String>,
    /// RSA exponent (base64url).
    pub e: Option<String>,
}

impl Jwk {
    /// Build a decoding key from the RSA components, if this key has them.
    fn decoding_key(&self) -> Option<DecodingKey> {
        if self.kty != "RSA" {
            tracing::debug!(kty = %self.kty, "Skipping non-RSA JWK");
            return None;
        }
        DecodingKey::from_rsa_components(self.n.as_ref()?, self.e.as_ref()?).ok()
    }
}

/// Cached signing keys, by kid, plus a fallback for tokens without one.
struct KeyCache {
    by_kid: HashMap<String, DecodingKey>,
    fallback: Option<DecodingKey>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn stale(&self) -> bool {
        match self.fetched_at {
            Some(at) => at.elapsed() >= KEY_CACHE_TTL,
            None => true,
        }
    }

    fn lookup(&self, kid: Option<&str>) -> Option<DecodingKey> {
        match kid {
            Some(kid) => self.by_kid.get(kid).cloned(),
            None => self.fallback.clone(),
        }
    }

    /// Swap in a freshly fetched key set. The first usable key becomes the
    /// fallback for tokens that carry no kid.
    fn replace(&mut self, jwks: &Jwks) {
        self.by_kid.clear();
        self.fallback = None;
        self.fetched_at = Some(Instant::now());

        for jwk in &jwks.keys {
            let Some(key) = jwk.decoding_key() else {
                continue;
            };
            if self.fallback.is_none() {
                self.fallback = Some(key.clone());
            }
            if let Some(kid) = &jwk.kid {
                self.by_kid.insert(kid.clone(), key);
            }
        }
    }
}

static KEY_CACHE: OnceLock<RwLock<KeyCache>> = OnceLock::new();
static JWKS_HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn key_cache() -> &'static RwLock<KeyCache> {
    KEY_CACHE.get_or_init(|| {
        RwLock::new(KeyCache {
            by_kid: HashMap::new(),
            fallback: None,
            fetched_at: None,
        })
    })
}

/// Shared HTTP client for JWKS fetches, so connections are pooled.
fn jwks_http() -> &'static reqwest::Client {
    JWKS_HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(JWKS_HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Validate a bearer JWT and return its claims.
async fn validate_jwt(token: &str, state: &AppState) -> Result<JwtClaims, ApiError> {
    let header = decode_header(token).map_err(|e| {
        tracing::debug!(error = %e, "Malformed JWT header");
        ApiError::Unauthorized
    })?;

    let key = signing_key(header.kid.as_deref(), state).await?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[&state.config.auth_audience]);
    validation.set_issuer(&[&state.config.auth_base_url]);

    let data = decode::<JwtClaims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT rejected");
        ApiError::Unauthorized
    })?;

    Ok(data.claims)
}

/// Look up the signing key for a kid, refreshing the cache when it is stale
/// or does not know the kid (key rotation).
async fn signing_key(kid: Option<&str>, state: &AppState) -> Result<DecodingKey, ApiError> {
    {
        let cache = key_cache().read().await;
        if !cache.stale() {
            if let Some(found) = cache.lookup(kid) {
                return Ok(found);
            }
        }
    }

    let jwks = fetch_jwks(&state.config.auth_base_url).await?;

    let mut cache = key_cache().write().await;
    cache.replace(&jwks);
    cache.lookup(kid).ok_or(ApiError::Unauthorized)
}

/// Fetch the JWKS document from the identity provider.
async fn fetch_jwks(auth_base_url: &str) -> Result<Jwks, ApiError> {
    let url = format!("{auth_base_url}/.well-known/jwks.json");

    tracing::debug!(url = %url, "Refreshing JWKS");

    let response = jwks_http().get(&url).send().await.map_err(|e| {
        tracing::error!(error = %e, url = %url, "JWKS fetch failed");
        ApiError::ExternalService("Failed to fetch authentication keys".into())
    })?;

    if !response.status().is_success() {
        tracing::error!(
            status = %response.status(),
            url = %url,
            "JWKS fetch returned an error status"
        );
        return Err(ApiError::ExternalService(
            "Failed to fetch authentication keys".into(),
        ));
    }

    let jwks: Jwks = response.json().await.map_err(|e| {
        tracing::error!(error = %e, "JWKS response did not parse");
        ApiError::ExternalService("Failed to parse authentication keys".into())
    })?;

    tracing::info!(keys = jwks.keys.len(), "JWKS refreshed");

    Ok(jwks)
}
