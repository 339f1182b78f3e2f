//! Retry-with-backoff and timeout primitives shared by remote providers.
//!
//! Both are plain higher-order async functions applied at the call site;
//! neither is applied automatically to any provider.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use affect_types::error::ProviderError;

/// Base unit of the exponential backoff: attempt `n` waits `2^n` of these.
pub const BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Run `operation` up to `max_retries` times with exponential backoff.
///
/// After failed attempt `n` (1-based) the next attempt waits `2^n` seconds
/// (2s, 4s, 8s, ...). There is no jitter and no wait before the first
/// attempt or after the last one. When every attempt fails, the last error
/// is returned. `max_retries` is clamped to at least 1.
pub async fn with_retry<T, E, F, Fut>(label: &str, max_retries: u32, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    with_retry_backoff(label, max_retries, BACKOFF_UNIT, operation).await
}

/// [`with_retry`] with a custom backoff unit.
pub async fn with_retry_backoff<T, E, F, Fut>(
    label: &str,
    max_retries: u32,
    unit: Duration,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max = max_retries.max(1);
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max => {
                tracing::warn!(
                    provider = %label,
                    attempt,
                    max,
                    error = %err,
                    "Final attempt failed"
                );
                return Err(err);
            }
            Err(err) => {
                let delay = backoff_delay(unit, attempt);
                tracing::warn!(
                    provider = %label,
                    attempt,
                    max,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Delay before the attempt following failed attempt `attempt`: `unit * 2^attempt`.
pub fn backoff_delay(unit: Duration, attempt: u32) -> Duration {
    unit.saturating_mul(2_u32.saturating_pow(attempt))
}

/// Race `operation` against a `timeout_ms` timer.
///
/// If the timer wins, the operation future is dropped -- for `reqwest`
/// calls this aborts the in-flight request -- and
/// [`ProviderError::Timeout`] is returned.
pub async fn with_timeout<T, F>(timeout_ms: u64, operation: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), operation).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ProviderError::Timeout {
            after_ms: timeout_ms,
        }),
    }
}
