use crate::config::RetryConfig;
use crate::error::{AdapterError, RunnerError};
use std::future::Future;
use tokio::time::sleep;
use tracing::warn;

/// Execute one inference call with bounded retries and exponential backoff.
///
/// Only the transient failure classes (timeout, connection, HTTP status)
/// are retried; anything else propagates on the first attempt. The delay
/// before the retry following zero-indexed attempt k is `base_delay * 2^k`,
/// so the first retry waits the base delay.
pub async fn robust_request<F, Fut, T>(
    retry: &RetryConfig,
    label: &str,
    mut operation: F,
) -> Result<T, RunnerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AdapterError>>,
{
    for attempt in 0..retry.max_retries {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => {
                warn!(
                    "{} - {} ({}/{})",
                    label,
                    err,
                    attempt + 1,
                    retry.max_retries
                );
                if attempt + 1 == retry.max_retries {
                    return Err(RunnerError::RetriesExhausted {
                        label: label.to_string(),
                        attempts: retry.max_retries,
                        source: err,
                    });
                }
                let delay = retry.backoff_delay(attempt);
                warn!("{} - retrying in {:.1}s", label, delay.as_secs_f64());
                sleep(delay).await;
            }
            Err(err) => return Err(err.into()),
        }
    }

    // Unreachable unless max_retries is zero
    Err(RunnerError::NoAttempts {
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    fn transient() -> AdapterError {
        AdapterError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }
    }

    fn cfg(max_retries: u32, base_delay_secs: f64) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_secs,
            cooldown_secs: 0,
        }
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let result = robust_request(&cfg(3, 1.0), "t", || async {
            Ok::<_, AdapterError>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_failures_with_exact_backoff() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let start = Instant::now();

        let result = robust_request(&cfg(4, 2.0), "t", || {
            let attempts = attempts_clone.clone();
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err(transient())
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        // Three delays of 2s, 4s and 8s under the paused clock
        assert_eq!(start.elapsed(), Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_attempts_fail() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: Result<(), _> = robust_request(&cfg(3, 1.0), "fake sim 7", || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            }
        })
        .await;

        match result.unwrap_err() {
            RunnerError::RetriesExhausted {
                label, attempts: n, ..
            } => {
                assert_eq!(label, "fake sim 7");
                assert_eq!(n, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fatal_error_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: Result<(), _> = robust_request(&cfg(5, 1.0), "t", || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(AdapterError::MalformedResponse("bad".to_string()))
            }
        })
        .await;

        assert!(matches!(result.unwrap_err(), RunnerError::Adapter(_)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retry_budget() {
        let result: Result<u32, _> = robust_request(&cfg(0, 1.0), "t", || async {
            Ok::<_, AdapterError>(1)
        })
        .await;

        assert!(matches!(result.unwrap_err(), RunnerError::NoAttempts { .. }));
    }
}
