// ==========================================
// Retail Replenishment APS - Bounded-Retry Read Guard
// ==========================================
// Policy: each analytical-store read runs under an explicit timeout
// and is retried exactly once with backoff. The second failure
// surfaces as DataUnavailable; the engine never retries indefinitely.
// ==========================================

use crate::error::{EngineError, EngineResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff between the first failure and the single retry.
pub const RETRY_BACKOFF_MS: u64 = 200;

/// Run a repository read with a timeout and one bounded retry.
///
/// `label` names the query shape for diagnostics (e.g. "on_hand_snapshot").
pub async fn fetch_with_retry<T, F, Fut>(
    label: &str,
    timeout: Duration,
    op: F,
) -> EngineResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = RepositoryResult<T>>,
{
    match run_once(timeout, op()).await {
        Ok(value) => Ok(value),
        Err(first_err) => {
            warn!(
                query = label,
                error = %first_err,
                "analytical store read failed, retrying once"
            );
            tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;

            run_once(timeout, op()).await.map_err(|second_err| {
                EngineError::DataUnavailable {
                    source_desc: format!("{}: {}", label, second_err),
                }
            })
        }
    }
}

async fn run_once<T, Fut>(timeout: Duration, fut: Fut) -> RepositoryResult<T>
where
    Fut: Future<Output = RepositoryResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(RepositoryError::ReadTimeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = fetch_with_retry("test", Duration::from_millis(100), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, RepositoryError>(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_single_failure() {
        let calls = AtomicU32::new(0);
        let result = fetch_with_retry("test", Duration::from_millis(100), || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(RepositoryError::DatabaseQueryError("flaky".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_failure_surfaces_data_unavailable() {
        let calls = AtomicU32::new(0);
        let result: EngineResult<i32> =
            fetch_with_retry("on_hand_snapshot", Duration::from_millis(100), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(RepositoryError::DatabaseQueryError("down".to_string())) }
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("on_hand_snapshot"));
        // Exactly one retry, never more
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_read_timeout() {
        let result: EngineResult<()> =
            fetch_with_retry("slow_query", Duration::from_millis(10), || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
