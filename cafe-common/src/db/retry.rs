//! Retry for optimistic cafe updates
//!
//! A writer that loses a compare-and-swap (or hits SQLite's lock) retries the
//! whole transaction with exponential backoff until `max_wait_ms` elapses.
//! Rule violations and other errors return immediately.

use crate::{Error, Result};
use std::time::{Duration, Instant};

const INITIAL_BACKOFF_MS: u64 = 10;
const MAX_BACKOFF_MS: u64 = 1000;

/// Whether `err` is worth another attempt
pub fn is_retryable(err: &Error) -> bool {
    match err {
        Error::VersionConflict { .. } => true,
        Error::Database(e) => e.to_string().contains("database is locked"),
        _ => false,
    }
}

/// Run `operation` until it succeeds, fails permanently, or the budget runs out
pub async fn retry_on_conflict<F, Fut, T>(
    operation_name: &str,
    max_wait_ms: u64,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let start_time = Instant::now();
    let max_duration = Duration::from_millis(max_wait_ms);
    let mut attempt = 0u32;
    let mut backoff_ms = INITIAL_BACKOFF_MS;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::debug!(
                        operation = operation_name,
                        attempt,
                        elapsed_ms = start_time.elapsed().as_millis() as u64,
                        "Succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) if is_retryable(&err) && start_time.elapsed() < max_duration => {
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    backoff_ms,
                    error = %err,
                    "Concurrent update, retrying"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
            }
            Err(err) => {
                if is_retryable(&err) {
                    tracing::error!(
                        operation = operation_name,
                        attempt,
                        elapsed_ms = start_time.elapsed().as_millis() as u64,
                        "Retry budget exhausted"
                    );
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleViolation;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn conflict() -> Error {
        Error::VersionConflict {
            entity: "cafe",
            id: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_conflict_is_retried_until_success() {
        let calls = &AtomicU32::new(0);
        let result = retry_on_conflict("test", 1000, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(conflict())
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rule_violation_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Result<()> = retry_on_conflict("test", 1000, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Rule(RuleViolation::TooManyImages { count: 4, max: 3 }))
        })
        .await;

        assert!(matches!(result, Err(Error::Rule(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_budget_exhaustion_returns_conflict() {
        let result: Result<()> = retry_on_conflict("test", 0, || async { Err(conflict()) }).await;
        assert!(matches!(result, Err(Error::VersionConflict { .. })));
    }
}
