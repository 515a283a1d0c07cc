//! Retry with exponential backoff around any async operation.
//!
//! Every failure is retried; callers that must not retry some failures
//! (for example `401`) filter them before handing the operation over.

use std::{future::Future, time::Duration};

use crate::RetryOptions;

/// Delay inserted after the failed attempt with 0-based index `attempt`.
///
/// `base_delay_ms * 2^attempt`, without jitter or cap. Saturates at
/// `u64::MAX` milliseconds instead of overflowing.
pub fn backoff_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    let multiplier = 2u64.saturating_pow(attempt);
    Duration::from_millis(base_delay_ms.saturating_mul(multiplier))
}

/// Runs `operation` up to `max_attempts` times, sleeping
/// `base_delay_ms * 2^i` after the failed attempt `i` when another attempt
/// follows.
///
/// Returns the first success, or exactly the last attempt's error once the
/// attempts are exhausted. `max_attempts == 0` still makes one attempt.
pub async fn retry<T, E, F, Fut>(operation: F, max_attempts: u32, base_delay_ms: u64) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with(
        operation,
        RetryOptions {
            max_attempts,
            base_delay_ms,
        },
    )
    .await
}

/// [`retry`] configured through [`RetryOptions`].
pub async fn retry_with<T, E, F, Fut>(mut operation: F, options: RetryOptions) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = options.max_attempts.max(1);
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt + 1 >= attempts {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempts, "retry attempts exhausted");
                    return Err(err);
                }

                let delay = backoff_delay(options.base_delay_ms, attempt);
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed; retrying after backoff"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    crate::browser::sleep(delay).await;
}
