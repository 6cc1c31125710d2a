//! Bounded retry for rate-limited upstream calls.

use std::future::Future;
use std::time::Duration;

use tracing::info;

use crate::{Error, Result};

/// Retry policy for calls that may hit an upstream rate limit.
///
/// Only `Error::RateLimited` is retried; every other error propagates
/// immediately. The delay honors the upstream `Retry-After` hint when one was
/// captured, falling back to `base_delay` (tests inject `Duration::ZERO`).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_retries: u32,
    /// Delay between attempts when the upstream gave no Retry-After hint.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Run `op`, retrying on rate limits until it succeeds or attempts run out.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(Error::RateLimited { retry_after }) if attempt < self.max_retries => {
                    let delay = retry_after
                        .map(Duration::from_secs)
                        .unwrap_or(self.base_delay);
                    info!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn zero_delay_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_rate_limits() {
        let attempts = AtomicU32::new(0);
        let result = zero_delay_policy()
            .run(|| {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(Error::RateLimited { retry_after: None })
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let result: Result<()> = zero_delay_policy()
            .run(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::RateLimited { retry_after: Some(0) }) }
            })
            .await;
        assert!(matches!(result, Err(Error::RateLimited { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_rate_limit_error_propagates_immediately() {
        let attempts = AtomicU32::new(0);
        let result: Result<()> = zero_delay_policy()
            .run(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::NotFound("XX".to_string())) }
            })
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
