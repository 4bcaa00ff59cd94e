use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

/// Retry-with-backoff applied to rate-limited provider calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts made after the first one.
    pub max_retries: u32,
    /// Lower bound applied to the server's retry hint.
    pub min_wait: Duration,
    /// Upper bound of the random delay added to each wait.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            min_wait: Duration::from_secs(1),
            max_jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Runs `op` until it succeeds, fails with an error `retry_after` rejects,
    /// or the retry budget is spent. The last error is returned unchanged.
    pub async fn run<T, E, F, Fut, P>(&self, action: &str, mut op: F, retry_after: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> Option<Duration>,
    {
        let mut attempt = 0;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let Some(hint) = retry_after(&err) else {
                return Err(err);
            };

            if attempt >= self.max_retries {
                return Err(err);
            }

            let wait = self.delay_for(hint);
            warn!(
                action,
                attempt,
                wait_ms = wait.as_millis() as u64,
                "⏳ Rate limit hit, retrying"
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    fn delay_for(&self, hint: Duration) -> Duration {
        hint.max(self.min_wait) + self.jitter()
    }

    fn jitter(&self) -> Duration {
        let max = self.max_jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;
    use crate::riot::RiotApiError;

    fn rate_limited(secs: u64) -> RiotApiError {
        RiotApiError::RateLimited {
            retry_after: Duration::from_secs(secs),
            limit_type: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_rate_limits_then_succeeds() {
        let calls = &AtomicU32::new(0);
        let started = Instant::now();

        let res = RetryPolicy::default()
            .run(
                "test",
                move || async move {
                    match calls.fetch_add(1, Ordering::SeqCst) {
                        0 | 1 => Err(rate_limited(0)),
                        _ => Ok("done"),
                    }
                },
                RiotApiError::retry_after,
            )
            .await;

        assert_eq!(res.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // both waits are raised to the one second floor
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_millis(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn honours_longer_retry_hint() {
        let calls = &AtomicU32::new(0);
        let started = Instant::now();

        let _ = RetryPolicy::default()
            .run(
                "test",
                move || async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(rate_limited(5))
                    } else {
                        Ok(())
                    }
                },
                RiotApiError::retry_after,
            )
            .await;

        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_budget() {
        let calls = &AtomicU32::new(0);

        let res: Result<(), _> = RetryPolicy::default()
            .run(
                "test",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(rate_limited(1))
                },
                RiotApiError::retry_after,
            )
            .await;

        assert!(matches!(res, Err(RiotApiError::RateLimited { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_other_errors() {
        let calls = &AtomicU32::new(0);

        let res: Result<(), _> = RetryPolicy::default()
            .run(
                "test",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(RiotApiError::Status {
                        status: 500,
                        body: "Internal".into(),
                    })
                },
                RiotApiError::retry_after,
            )
            .await;

        assert!(matches!(res, Err(RiotApiError::Status { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn jitter_stays_below_bound() {
        let policy = RetryPolicy::default();
        for _ in 0..100 {
            assert!(policy.jitter() < Duration::from_millis(250));
        }

        let none = RetryPolicy {
            max_jitter: Duration::ZERO,
            ..policy
        };
        assert_eq!(none.delay_for(Duration::ZERO), Duration::from_secs(1));
    }
}
