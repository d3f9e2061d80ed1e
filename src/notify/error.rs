//! Error types for the notification context.

use thiserror::Error;

/// Errors that can occur while acquiring a bearer credential.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The service-account key material could not be read or parsed.
    #[error("invalid service-account key: {0}")]
    InvalidKey(String),

    /// The JWT-bearer assertion could not be built or signed.
    #[error("assertion signing failed: {0}")]
    Assertion(String),

    /// The token-exchange request failed at the transport level.
    #[error("token exchange failed: {0}")]
    Exchange(#[from] reqwest::Error),

    /// The token endpoint rejected the exchange.
    #[error("token endpoint rejected the exchange with status {status}")]
    Rejected {
        /// The HTTP status returned by the token endpoint.
        status: u16,
    },
}

/// Errors that can occur while dispatching a push notification.
///
/// Dispatch is best-effort: the relay retries transient failures with
/// bounded backoff, then logs and swallows the error. A failed push never
/// rolls back a stored message and is never surfaced to the sender.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A bearer credential could not be acquired.
    #[error("credential acquisition failed: {0}")]
    Token(#[from] TokenError),

    /// The push request failed at the transport level.
    #[error("push request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The push endpoint rejected the request.
    #[error("push endpoint rejected the request with status {status}: {body}")]
    Rejected {
        /// The HTTP status returned by the push endpoint.
        status: u16,
        /// The response body, for operator diagnostics.
        body: String,
    },
}

impl DispatchError {
    /// Returns `true` if the dispatch may succeed when retried.
    ///
    /// Transport failures and throttling/server statuses are transient;
    /// a definitive rejection (bad payload, revoked credential) is not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Token(err) => matches!(err, TokenError::Exchange(_)),
            Self::Rejected { status, .. } => {
                matches!(status, 408 | 429) || (500..=599).contains(status)
            }
        }
    }
}
