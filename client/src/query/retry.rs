//! Retry decisions and backoff for queries.
//!
//! Mutations never go through this module: they are single-shot.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

use crate::net::error::ApiError;

/// Upper bound on the backoff between attempts.
const MAX_RETRY_DELAY_MS: u32 = 30_000;
/// Delay before the first retry; doubled for each further failure.
const BASE_RETRY_DELAY_MS: u32 = 1_000;

/// How many times a failed query is re-attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    /// Fail on the first error.
    pub const fn never() -> Self {
        Self { max_retries: 0 }
    }

    pub const fn up_to(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Whether to try again after `failure_count` earlier failures and the
    /// current `error`.
    ///
    /// 401 answers never retry: the session is gone and repeating the request
    /// only delays the redirect to login. Missing transports never retry either.
    pub fn should_retry(self, failure_count: u32, error: &ApiError) -> bool {
        if error.is_unauthorized() || matches!(error, ApiError::Unavailable) {
            return false;
        }
        failure_count < self.max_retries
    }

    /// Backoff before the attempt following `failure_count` failures.
    pub fn delay_ms(self, failure_count: u32) -> u32 {
        let delay = u64::from(BASE_RETRY_DELAY_MS) << failure_count.min(16);
        u32::try_from(delay.min(u64::from(MAX_RETRY_DELAY_MS))).unwrap_or(MAX_RETRY_DELAY_MS)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::up_to(3)
    }
}
