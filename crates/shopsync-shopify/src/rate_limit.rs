//! Retry with exponential backoff for transient Shopify failures.
//!
//! Only HTTP 429 and connectivity failures are retried. Everything else
//! (4xx/5xx statuses, parse failures, pagination guard) is returned on the
//! first occurrence.

use std::future::Future;
use std::time::Duration;

use crate::error::ShopifyError;

/// Returns `true` if `err` is transient and worth another attempt.
///
/// - [`ShopifyError::RateLimited`]: HTTP 429, Shopify asked us to back off.
/// - [`ShopifyError::Unreachable`]: connect failure or timeout.
fn is_retriable(err: &ShopifyError) -> bool {
    matches!(
        err,
        ShopifyError::RateLimited { .. } | ShopifyError::Unreachable { .. }
    )
}

/// Delay before retry number `attempt + 1`: `backoff_base_secs * 2^attempt`,
/// raised to Shopify's `Retry-After` when that is longer.
fn backoff_delay_secs(err: &ShopifyError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let exponential = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        ShopifyError::RateLimited { retry_after_secs } => exponential.max(*retry_after_secs),
        _ => exponential,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional times. With `max_retries = 3` the operation runs at most 4
/// times. The last error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ShopifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShopifyError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_delay_secs(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient Shopify error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited(retry_after_secs: u64) -> ShopifyError {
        ShopifyError::RateLimited { retry_after_secs }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ShopifyError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited(0))
                } else {
                    Ok::<u32, ShopifyError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ShopifyError>(rate_limited(0))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ShopifyError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_unexpected_status() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ShopifyError>(ShopifyError::UnexpectedStatus {
                    status: 422,
                    url: "https://shop.example.com/admin/api/2025-07/products.json".to_owned(),
                    body: "{}".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(ShopifyError::UnexpectedStatus { status: 422, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                let e = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
                Err::<u32, ShopifyError>(ShopifyError::Deserialize {
                    context: "test".to_owned(),
                    source: e,
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ShopifyError::Deserialize { .. })));
    }

    #[test]
    fn retry_after_extends_short_backoff() {
        assert_eq!(backoff_delay_secs(&rate_limited(5), 0, 2), 5);
        assert_eq!(backoff_delay_secs(&rate_limited(1), 2, 2), 8);
    }
}
