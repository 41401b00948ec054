use std::cmp;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::RetryConfig;
use crate::error::{Result, WayfarerError};

/// Bounded exponential-backoff retry for provider calls, specialized for
/// rate-limit failures. This is the only place in the crate that sleeps.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
        }
    }

    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self::new(
            cfg.max_attempts,
            Duration::from_millis(cfg.initial_delay_ms),
            Duration::from_millis(cfg.max_delay_ms),
        )
    }

    /// Backoff delay after a rate-limited attempt (1-based), capped.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        cmp::min(
            self.initial_delay * 2u32.saturating_pow(attempt.saturating_sub(1)),
            self.max_delay,
        )
    }

    /// Execute `op` with up to `max_attempts` attempts. An unconditional
    /// warm-up wait precedes the first attempt; freshly issued provider
    /// credentials throttle hard for the first few seconds. Only
    /// rate-limited failures are retried; anything else propagates
    /// immediately.
    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        tracing::debug!(delay_ms = self.initial_delay.as_millis() as u64, "warm-up delay");
        sleep(self.initial_delay).await;

        for attempt in 1..=self.max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_rate_limited() => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "rate limit hit: {e}"
                    );

                    if attempt == self.max_attempts {
                        return Err(WayfarerError::RateLimitExceeded(
                            "Rate limit exceeded. If you're using a new API key, please note \
                             that it may take a few minutes for the API to warm up to full \
                             capacity. Please wait a moment before trying again."
                                .to_string(),
                        ));
                    }

                    let delay = self.backoff_delay(attempt);
                    tracing::info!(delay_ms = delay.as_millis() as u64, "backing off");
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(WayfarerError::Internal(
            "Maximum retries reached".to_string(),
        ))
    }
}
