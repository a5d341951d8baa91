use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy for a translation request.
///
/// Kept separate from the HTTP code so the backoff schedule can be tested on
/// its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (2.0 doubles the delay each time)
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Create a new policy with a doubling backoff and a 30s ceiling.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    /// Set the maximum delay between retries
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Preset: per-chunk translation (5 attempts)
    /// Delays: 1s, 2s, 4s, 8s = 15s worst-case wait per chunk
    pub fn chunk_translation() -> Self {
        Self::new(5, Duration::from_secs(1))
    }

    /// Delay to wait before the given attempt (0-indexed).
    ///
    /// Attempt 0 never waits; attempt `i` waits `base_delay * multiplier^(i-1)`,
    /// capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.base_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Sum of all delays a fully failing operation would wait through.
    pub fn worst_case_wait(&self) -> Duration {
        (0..self.max_attempts)
            .map(|attempt| self.delay_for_attempt(attempt))
            .sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::chunk_translation()
    }
}

/// Run `operation` until it succeeds or the policy runs out of attempts.
///
/// Returns the error from the final attempt. A policy with `max_attempts`
/// of 0 still runs the operation once.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let delay = policy.delay_for_attempt(attempt);
        if !delay.is_zero() {
            debug!(
                "{}: waiting {:?} before attempt {}/{}",
                operation_name,
                delay,
                attempt + 1,
                attempts
            );
            sleep(delay).await;
        }

        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{}: recovered on attempt {}/{}", operation_name, attempt + 1, attempts);
                }
                return Ok(value);
            }
            Err(e) if attempt + 1 < attempts => {
                warn!(
                    "{}: attempt {}/{} failed: {}",
                    operation_name,
                    attempt + 1,
                    attempts,
                    e
                );
                attempt += 1;
            }
            Err(e) => {
                warn!("{}: giving up after {} attempts: {}", operation_name, attempts, e);
                return Err(e);
            }
        }
    }
}
