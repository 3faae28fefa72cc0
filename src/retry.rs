use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Returned by [`retry`] when every attempt failed.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// Number of attempts made.
    pub attempts: usize,
    /// Error of the final attempt.
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempt(s): {}",
            self.attempts, self.last_error
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryExhausted<E> {}

/// Runs `op` until it succeeds, at most `attempts` times.
///
/// Failed attempts are swallowed and followed by a fixed `delay`, except the
/// last one. `attempts == 0` runs `op` once.
pub async fn retry<T, E, F, Fut>(
    attempts: usize,
    delay: Duration,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    E: fmt::Display,
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 0usize;
    loop {
        let err = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        attempt += 1;

        if attempt >= attempts {
            return Err(RetryExhausted {
                attempts: attempt,
                last_error: err,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt,
            max_attempts = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "attempt failed, retrying"
        );

        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
