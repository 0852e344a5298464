//! Bounded re-attempts of a fallible operation.

use std::thread;
use std::time::Duration;

/// Delay applied between two attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same delay before every retry.
    Fixed(Duration),
    /// `initial * 2^(n-1)` before retry `n`, never more than `max`.
    Exponential { initial: Duration, max: Duration },
}

/// Attempt count plus inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    /// Three attempts, one second apart.
    fn default() -> Self {
        RetryPolicy::fixed(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(d) => d,
            Backoff::Exponential { initial, max } => {
                let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                initial.checked_mul(factor).map_or(max, |d| d.min(max))
            }
        }
    }

    /// Run `op` until it succeeds, fails with an error `retryable` rejects,
    /// or `max_attempts` attempts have failed.
    ///
    /// `on_retry(attempt, &err)` is called after every retryable failure,
    /// including the last; an error from it aborts the run. There is no delay
    /// after the last attempt. Returns the last error once the attempts are used up.
    pub fn run<T, E, F, R, L>(&self, op: F, retryable: R, on_retry: L) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        R: Fn(&E) -> bool,
        L: FnMut(u32, &E) -> Result<(), E>,
    {
        self.run_with_sleep(op, retryable, on_retry, thread::sleep)
    }

    pub(crate) fn run_with_sleep<T, E, F, R, L, S>(
        &self,
        mut op: F,
        retryable: R,
        mut on_retry: L,
        mut sleep: S,
    ) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        R: Fn(&E) -> bool,
        L: FnMut(u32, &E) -> Result<(), E>,
        S: FnMut(Duration),
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(v) => return Ok(v),
                Err(e) if retryable(&e) => {
                    on_retry(attempt, &e)?;
                    if attempt >= attempts {
                        return Err(e);
                    }
                    sleep(self.delay_after(attempt));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
