//! Backoff around a single Google AI call.

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::warn;

use super::errors::GoogleAiError;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total tries, the first one included
    pub attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// No attempt starts once this much time has passed
    pub deadline: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: usize, deadline: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            deadline,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

/// Run `call` until it succeeds, fails with a non-transient error, or the
/// policy runs out. The last error is returned unchanged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut call: F) -> Result<T, GoogleAiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GoogleAiError>>,
{
    let started = Instant::now();
    let mut backoff = ExponentialBackoff {
        initial_interval: policy.initial_delay,
        max_interval: policy.max_delay,
        max_elapsed_time: None,
        ..Default::default()
    };
    backoff.reset();

    let mut attempt = 1;
    loop {
        let error = match call().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !error.is_transient() || attempt >= policy.attempts {
            return Err(error);
        }

        let delay = error
            .retry_after()
            .or_else(|| backoff.next_backoff())
            .unwrap_or(policy.max_delay)
            .min(policy.max_delay);
        if started.elapsed() + delay > policy.deadline {
            return Err(error);
        }

        warn!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Google AI call failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
