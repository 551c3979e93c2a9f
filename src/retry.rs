//! Bounded fixed-delay retry policy for transient provider failures.
//!
//! The policy is intentionally minimal: a fixed attempt count with a fixed
//! inter-attempt delay, and only server-side (5xx) statuses qualify as
//! retryable. Anything else is returned to the caller immediately for normal
//! error handling. There is no backoff curve and no jitter.

use std::time::Duration;

/// Default maximum attempts (including the initial attempt).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Configuration for the bounded retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Fixed delay between attempts.
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with a custom attempt count, keeping the default
    /// delay. `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Returns a copy of this policy with a different inter-attempt delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the fixed delay between attempts.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a response status qualifies for another attempt.
    ///
    /// Only server-side errors do; client errors and successes are final.
    #[must_use]
    pub fn is_retryable(&self, status: u16) -> bool {
        (500..600).contains(&status)
    }
}
