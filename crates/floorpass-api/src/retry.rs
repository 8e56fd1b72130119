// Exponential backoff for idempotent calls.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::Error;

/// How many times to try an idempotent call, and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// `base_delay * 2^attempt`, where `attempt` counts failures so far
    /// starting at zero.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.checked_pow(attempt).unwrap_or(u32::MAX))
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are exhausted. The last error is returned as-is.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt + 1 < attempts => {
                let delay = policy.delay_for(attempt);
                debug!(attempt, ?delay, error = %err, "transient failure, backing off");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::ErrorResponse;

    fn api_error(status: u16) -> Error {
        Error::Api(ErrorResponse::synthesize(status, "", "boom".into(), "/test"))
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_server_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(RetryPolicy::default(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(api_error(503))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), Error> = with_retry(RetryPolicy::default(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(api_error(500))
        })
        .await;

        assert_eq!(result.unwrap_err().status_code(), 500);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limiting_is_retried() {
        let calls = AtomicU32::new(0);
        let result = with_retry(RetryPolicy::default(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(api_error(429))
            } else {
                Ok(())
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        for status in [400, 401, 403, 404, 409, 422] {
            let calls = AtomicU32::new(0);
            let result: Result<(), Error> = with_retry(RetryPolicy::default(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(api_error(status))
            })
            .await;

            assert_eq!(result.unwrap_err().status_code(), status);
            assert_eq!(calls.load(Ordering::SeqCst), 1, "status {status} was retried");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_with_exponential_backoff() {
        let start = tokio::time::Instant::now();
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        };
        let _: Result<(), Error> = with_retry(policy, || async { Err(api_error(502)) }).await;

        // 250ms + 500ms between the three attempts
        assert_eq!(start.elapsed(), Duration::from_millis(750));
    }
}
