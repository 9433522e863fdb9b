//! Retry policies with exponential backoff.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;

use crate::config::{
    CONTENT_RETRY_INITIAL_DELAY_MS, CONTENT_RETRY_MAX_ATTEMPTS, DYNAMIC_RETRY_INITIAL_DELAY_MS,
    DYNAMIC_RETRY_MAX_ATTEMPTS, RETRY_BACKOFF_MULTIPLIER, STATIC_RETRY_INITIAL_DELAY_MS,
    STATIC_RETRY_MAX_ATTEMPTS,
};

/// Bounded exponential backoff.
///
/// The operation runs up to `max_attempts` times. After the k-th failure
/// (k starting at 0) the policy waits `initial_delay * backoff_multiplier^k`.
/// The error of the final attempt is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, initial_delay: Duration, backoff_multiplier: u32) -> Self {
        Self {
            max_attempts,
            initial_delay,
            backoff_multiplier,
        }
    }

    /// Policy for plain HTTP source fetches.
    pub fn static_fetch() -> Self {
        Self::new(
            STATIC_RETRY_MAX_ATTEMPTS,
            Duration::from_millis(STATIC_RETRY_INITIAL_DELAY_MS),
            RETRY_BACKOFF_MULTIPLIER,
        )
    }

    /// Policy for browser-rendered source fetches.
    pub fn dynamic_fetch() -> Self {
        Self::new(
            DYNAMIC_RETRY_MAX_ATTEMPTS,
            Duration::from_millis(DYNAMIC_RETRY_INITIAL_DELAY_MS),
            RETRY_BACKOFF_MULTIPLIER,
        )
    }

    /// Policy for article main-text extraction.
    pub fn content() -> Self {
        Self::new(
            CONTENT_RETRY_MAX_ATTEMPTS,
            Duration::from_millis(CONTENT_RETRY_INITIAL_DELAY_MS),
            RETRY_BACKOFF_MULTIPLIER,
        )
    }

    /// The waits between attempts, one fewer than `max_attempts`.
    ///
    /// `tokio_retry`'s `ExponentialBackoff` raises the base to the attempt
    /// number instead of scaling a start delay, so the schedule is built here.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let initial = self.initial_delay;
        let multiplier = self.backoff_multiplier;
        (0..self.max_attempts.saturating_sub(1))
            .map(move |k| initial.saturating_mul(multiplier.saturating_pow(k as u32)))
    }
}

/// Runs `operation` under `policy` using `tokio_retry::Retry`.
///
/// Each failed attempt is logged at warn level with `label`; success and the
/// final error are returned unchanged.
pub async fn retry_with_policy<T, F, Fut>(policy: &RetryPolicy, label: &str, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut operation = operation;
    let mut attempt = 0usize;

    tokio_retry::Retry::spawn(policy.delays(), move || {
        attempt += 1;
        let current = attempt;
        let fut = operation();
        async move {
            fut.await.map_err(|e| {
                if current < max_attempts {
                    log::warn!(
                        "{} failed (attempt {}/{}), retrying: {:#}",
                        label,
                        current,
                        max_attempts,
                        e
                    );
                } else {
                    log::warn!(
                        "{} failed (attempt {}/{}), giving up: {:#}",
                        label,
                        current,
                        max_attempts,
                        e
                    );
                }
                e
            })
        }
    })
    .await
}
