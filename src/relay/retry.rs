//! Bounded retry with exponential backoff.
//!
//! Store appends retry transient unavailability before surfacing it;
//! notification dispatch retries transient failures before being dropped
//! as best-effort. Backoff doubles per attempt up to a cap.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Default number of attempts, including the first.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff before the first retry.
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Default backoff cap.
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Configuration for retry behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Creates the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sets the total number of attempts, including the first.
    ///
    /// A value of zero is treated as one: the operation always runs once.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the backoff before the first retry.
    #[must_use]
    pub const fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Sets the backoff cap.
    #[must_use]
    pub const fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }

    /// Runs `operation`, retrying transient failures with exponential
    /// backoff until the attempt budget is exhausted.
    ///
    /// `describe` names the operation in retry logs. Non-transient errors
    /// and the final attempt's error are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the last error produced by `operation`.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        describe: &str,
        is_transient: P,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: fmt::Display,
    {
        let mut backoff = self.initial_backoff;
        let mut attempt: u32 = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && is_transient(&err) => {
                    tracing::warn!(
                        error = %err,
                        attempt,
                        operation = describe,
                        "transient failure, backing off before retry"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2).min(self.max_backoff);
                    attempt = attempt.saturating_add(1);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
