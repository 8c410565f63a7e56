//! Bounded retry with exponential backoff for transient provider overload.
//!
//! The sleep is injected so tests can record the schedule instead of
//! waiting it out.

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::provider::error::ProviderError;

/// Retry `op` while it fails with a transient error, waiting `initial_delay`
/// before the first retry and doubling the delay after each failed attempt.
/// Non-transient errors are returned immediately; the last transient error
/// is returned once attempts are exhausted.
pub async fn retry_on_overload<T, F, Fut, S, SFut>(
    policy: RetryConfig,
    mut op: F,
    sleep: S,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = Duration::from_millis(policy.initial_delay_ms);

    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "Provider overloaded, retrying");
                sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("loop returns on the last attempt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn policy(max_attempts: u32, initial_delay_ms: u64) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay_ms,
        }
    }

    #[tokio::test]
    async fn test_two_overloads_then_success() {
        let attempts = AtomicU32::new(0);
        let sleeps: Mutex<Vec<Duration>> = Mutex::new(Vec::new());

        let result = retry_on_overload(
            policy(3, 100),
            || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ProviderError::Overloaded { status: 429 })
                    } else {
                        Ok("готово")
                    }
                }
            },
            |d| {
                sleeps.lock().unwrap().push(d);
                std::future::ready(())
            },
        )
        .await;

        assert_eq!(result.unwrap(), "готово");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // backoff schedule: D, then 2D
        assert_eq!(
            *sleeps.lock().unwrap(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), _> = retry_on_overload(
            policy(5, 10),
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ProviderError::Api {
                        status: 400,
                        message: String::from("bad request"),
                    })
                }
            },
            |_| std::future::ready(()),
        )
        .await;

        assert!(matches!(result, Err(ProviderError::Api { status: 400, .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_return_last_overload() {
        let attempts = AtomicU32::new(0);
        let sleeps: Mutex<Vec<Duration>> = Mutex::new(Vec::new());

        let result: Result<(), _> = retry_on_overload(
            policy(3, 50),
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::Overloaded { status: 503 }) }
            },
            |d| {
                sleeps.lock().unwrap().push(d);
                std::future::ready(())
            },
        )
        .await;

        assert!(matches!(result, Err(ProviderError::Overloaded { status: 503 })));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // no sleep after the final attempt
        assert_eq!(sleeps.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_is_not_transient() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), _> = retry_on_overload(
            policy(4, 10),
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::Unreachable(String::from("connect refused"))) }
            },
            |_| std::future::ready(()),
        )
        .await;

        assert!(matches!(result, Err(ProviderError::Unreachable(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
