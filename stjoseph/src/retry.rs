//! Bounded exponential backoff and the classification of failures into retry classes.
//!
//! Every remote call made by [`crate::channel::Channel`] and every token refresh made by
//! [`crate::credentials::CredentialsManager`] goes through a [`Backoff`] loop. Whether a failure
//! is worth another attempt is decided by [`ErrorClass::of`], which looks at the typed errors in
//! an [`eyre::Report`] chain rather than at any particular error object.

use crate::credentials::AuthError;
use crate::youtube_api::ApiError;
use http::StatusCode;
use std::time::Duration;

/// Maximum number of attempts (including the first) for a single remote operation.
pub const MAX_ATTEMPTS: u32 = 3;

/// How a failure should be treated by a retrying caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Credentials were rejected or could not be refreshed.
    ///
    /// Callers tear down any cached API handle and invalidate the token before retrying.
    RetryableAuth,
    /// The remote side failed in a way that is expected to go away on its own.
    RetryableTransient,
    /// Retrying will not help.
    Fatal,
}

impl ErrorClass {
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::Fatal)
    }

    /// Classifies a report by walking its cause chain for an error we know how to judge.
    ///
    /// Anything unrecognized (including local validation failures) is [`ErrorClass::Fatal`].
    pub fn of(error: &eyre::Report) -> Self {
        for cause in error.chain() {
            if let Some(auth) = cause.downcast_ref::<AuthError>() {
                return match auth {
                    AuthError::Refresh(_) => Self::RetryableAuth,
                    _ => Self::Fatal,
                };
            }
            if let Some(api) = cause.downcast_ref::<ApiError>() {
                return classify(api.status, api.reason.as_deref());
            }
            if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
                if e.is_timeout() || e.is_connect() {
                    return Self::RetryableTransient;
                }
                return Self::Fatal;
            }
        }
        Self::Fatal
    }
}

/// Maps a YouTube API status code and error reason to a retry class.
///
/// See: <https://developers.google.com/youtube/v3/docs/errors>
pub fn classify(status: StatusCode, reason: Option<&str>) -> ErrorClass {
    match status {
        StatusCode::UNAUTHORIZED => ErrorClass::RetryableAuth,
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => ErrorClass::RetryableTransient,
        StatusCode::FORBIDDEN
            if matches!(
                reason,
                Some("rateLimitExceeded" | "userRateLimitExceeded" | "backendError")
            ) =>
        {
            ErrorClass::RetryableTransient
        }
        _ => ErrorClass::Fatal,
    }
}

/// Attempt budget and delay schedule for retried operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for every attempt after that.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(32),
        }
    }
}

impl RetryPolicy {
    /// A policy with the given attempt budget that never sleeps between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn backoff(&self) -> Backoff {
        Backoff {
            policy: *self,
            failures: 0,
        }
    }
}

/// Tracks failed attempts of one operation against a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: RetryPolicy,
    failures: u32,
}

impl Backoff {
    /// Records a failed attempt and returns how long to wait before the next one.
    ///
    /// Returns `None` once the attempt budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.failures += 1;
        if self.failures >= self.policy.max_attempts {
            return None;
        }
        let factor = 2u32.saturating_pow(self.failures - 1);
        Some(
            self.policy
                .initial_delay
                .saturating_mul(factor)
                .min(self.policy.max_delay),
        )
    }

    /// Number of failed attempts recorded so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
