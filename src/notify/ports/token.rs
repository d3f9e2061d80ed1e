//! Access-token source port.
//!
//! Credential acquisition is abstracted so the dispatcher does not care
//! whether tokens come from a live OAuth2 exchange, a cache, or a test
//! stub.

use crate::notify::error::TokenError;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Result type for credential operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// A short-lived bearer credential.
///
/// The secret is redacted from `Debug` output so tokens cannot leak into
/// logs.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates an access token from its secret and expiry instant.
    #[must_use]
    pub const fn new(secret: String, expires_at: DateTime<Utc>) -> Self {
        Self { secret, expires_at }
    }

    /// Returns the bearer secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns the expiry instant.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns `true` if the token is still usable at `now`, leaving
    /// `margin` of headroom before the actual expiry.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        now + margin < self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Port for acquiring bearer credentials for the push provider.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Returns a bearer token valid for at least the near future.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the credential could not be acquired.
    async fn access_token(&self) -> TokenResult<AccessToken>;
}
