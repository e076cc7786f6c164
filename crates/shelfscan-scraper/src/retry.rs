//! Retry with capped exponential back-off, independent of HTTP.
//!
//! [`RetryPolicy::run`] wraps any fallible async operation. Every error is
//! treated as transient; only the attempt ceiling stops the loop.
//!
//! Sleeping goes through [`Sleeper`] so tests can substitute a fake clock.

use std::future::Future;
use std::time::Duration;

use shelfscan_core::RetrySettings;

/// Source of back-off delays.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Real wall-clock sleeping on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(delay)
    }
}

/// Returned by [`RetryPolicy::run`] once the attempt ceiling is reached.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last: E,
}

/// Attempt ceiling plus back-off schedule.
///
/// Delay after failed attempt `n` (1-based):
/// `clamp(multiplier * 2^(n-1), base_delay, max_delay)`.
///
/// | Failed attempt | Defaults (4s floor, 1s multiplier, 10s cap) |
/// |----------------|---------------------------------------------|
/// | 1              | 4 s                                         |
/// | 2              | 4 s                                         |
/// | 3              | 4 s                                         |
/// | 4              | 8 s                                         |
/// | 5              | none, ceiling reached                       |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    multiplier: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first try; zero is bumped to one.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        multiplier: Duration,
        max_delay: Duration,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            multiplier,
            max_delay,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(
            settings.max_attempts,
            Duration::from_secs(settings.base_delay_secs),
            Duration::from_secs(settings.multiplier_secs),
            Duration::from_secs(settings.max_delay_secs),
        )
    }

    /// Same attempt ceiling, zero back-off. Used by tests that hit a mock server.
    #[must_use]
    pub fn without_delay(max_attempts: u32) -> Self {
        Self::new(
            max_attempts,
            Duration::ZERO,
            Duration::ZERO,
            Duration::ZERO,
        )
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Back-off to wait after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.multiplier
            .saturating_mul(1u32 << exponent)
            .max(self.base_delay)
            .min(self.max_delay)
    }

    /// Runs `operation` until it succeeds or `max_attempts` calls have failed.
    ///
    /// # Errors
    ///
    /// Returns [`RetryExhausted`] carrying the attempt count and the error of
    /// the final attempt.
    pub async fn run<T, E, F, Fut, S>(
        &self,
        sleeper: &S,
        mut operation: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        S: Sleeper,
    {
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_secs = delay.as_secs(),
                        error = %err,
                        "upstream request failed, retrying after back-off"
                    );
                    sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
