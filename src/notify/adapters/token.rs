//! Service-account credential exchange and token caching.
//!
//! The push provider authenticates sends with a short-lived bearer token
//! obtained from a long-lived service-account key: an RS256-signed
//! JWT-bearer assertion is exchanged at the key's `token_uri` for an
//! access token scoped to the messaging API. Tokens are cached until near
//! expiry behind a single-flight guard, so concurrent sends never trigger
//! duplicate exchanges.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::notify::{
    error::TokenError,
    ports::token::{AccessToken, AccessTokenSource, TokenResult},
};

/// OAuth2 scope granting access to the messaging send API.
pub const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Grant type for the JWT-bearer token exchange.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime requested from the token endpoint.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh tokens this long before their actual expiry.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Long-lived service-account key material, as distributed in the
/// provider's JSON key file.
///
/// The private key is redacted from `Debug` output.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// The service account's email, used as the assertion issuer.
    client_email: String,
    /// PEM-encoded RSA private key.
    private_key: String,
    /// The OAuth2 token endpoint to exchange assertions at.
    token_uri: String,
    /// The cloud project this key belongs to, when present in the file.
    #[serde(default)]
    project_id: Option<String>,
}

impl ServiceAccountKey {
    /// Parses key material from the JSON key file contents.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] if the JSON is malformed or
    /// missing required fields.
    pub fn from_json(json: &str) -> TokenResult<Self> {
        serde_json::from_str(json).map_err(|e| TokenError::InvalidKey(e.to_string()))
    }

    /// Loads key material from a JSON key file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] if the file cannot be read or
    /// parsed.
    pub fn from_file(path: &Path) -> TokenResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| TokenError::InvalidKey(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Returns the service account's email.
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Returns the project id recorded in the key file, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// JWT-bearer assertion claims for the token exchange.
#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Token endpoint response body.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// [`AccessTokenSource`] performing a live OAuth2 JWT-bearer exchange.
///
/// Each call signs a fresh assertion and posts it to the key's token
/// endpoint. Wrap in [`CachingTokenSource`] to avoid the per-send exchange
/// latency and rate-limit exposure.
#[derive(Debug, Clone)]
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    scope: String,
    http: reqwest::Client,
}

impl ServiceAccountTokenSource {
    /// Creates a token source scoped to the messaging API.
    #[must_use]
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            scope: MESSAGING_SCOPE.to_owned(),
            http: reqwest::Client::new(),
        }
    }

    /// Overrides the requested OAuth2 scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    fn signed_assertion(&self, iat: i64) -> TokenResult<String> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| TokenError::Assertion(e.to_string()))
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> TokenResult<AccessToken> {
        let now = Utc::now();
        let assertion = self.signed_assertion(now.timestamp())?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: TokenResponse = response.json().await?;
        Ok(AccessToken::new(
            body.access_token,
            now + TimeDelta::seconds(body.expires_in),
        ))
    }
}

/// Expiry-aware caching decorator over an [`AccessTokenSource`].
///
/// Returns the cached token while it remains fresh (60 s of headroom) and
/// refreshes it through the inner source otherwise. The async mutex is
/// held across the refresh, giving single-flight semantics: concurrent
/// callers wait for one exchange instead of issuing their own.
pub struct CachingTokenSource<S, K>
where
    S: AccessTokenSource,
    K: Clock + Send + Sync,
{
    inner: S,
    clock: Arc<K>,
    margin: TimeDelta,
    cached: Mutex<Option<AccessToken>>,
}

impl<S, K> CachingTokenSource<S, K>
where
    S: AccessTokenSource,
    K: Clock + Send + Sync,
{
    /// Wraps a token source with the default refresh margin.
    #[must_use]
    pub fn new(inner: S, clock: Arc<K>) -> Self {
        Self {
            inner,
            clock,
            margin: TimeDelta::seconds(REFRESH_MARGIN_SECS),
            cached: Mutex::new(None),
        }
    }

    /// Overrides how long before expiry a token is refreshed.
    #[must_use]
    pub fn with_margin(mut self, margin: TimeDelta) -> Self {
        self.margin = margin;
        self
    }
}

#[async_trait]
impl<S, K> AccessTokenSource for CachingTokenSource<S, K>
where
    S: AccessTokenSource,
    K: Clock + Send + Sync,
{
    async fn access_token(&self) -> TokenResult<AccessToken> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && token.is_fresh(self.clock.utc(), self.margin)
        {
            return Ok(token.clone());
        }

        let token = self.inner.access_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }
}
