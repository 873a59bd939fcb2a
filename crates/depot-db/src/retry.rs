//! Transient remote-store error retry logic.
//!
//! Remote libSQL (Turso) endpoints occasionally reject requests while nodes
//! are recycled or a shared lock is held during provisioning. Those errors
//! clear on their own within seconds, so [`crate::DepotDb`] retries them with
//! exponential backoff. Local databases never take the retry path.

use std::time::Duration;

/// Configuration for retry behavior on transient remote errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Default backoff with a custom attempt budget. Zero is treated as one.
    #[must_use]
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Detect transient remote infrastructure errors.
///
/// The predicate is narrow on purpose: SQL and constraint errors are never
/// retried.
pub fn is_transient_error(e: &libsql::Error) -> bool {
    let msg = e.to_string().to_ascii_lowercase();
    msg.contains("unable to acquire shared lock")
        || msg.contains("deletion must be in progress")
        || msg.contains("database is locked")
        || msg.contains("connection reset")
        || msg.contains("timed out")
}
