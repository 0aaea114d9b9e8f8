//! Bounded exponential-backoff retry for tool calls

use crate::config::RetrySettings;
use crate::ToolResult;
use std::future::Future;
use std::time::Duration;

/// Retry schedule for an external tool call
///
/// An operation is attempted once, then retried up to `retries` more times.
/// Before retry `n` (counting from zero) the policy sleeps
/// `base_delay × backoff_factor^n`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            retries,
            base_delay,
            backoff_factor,
        }
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(
            settings.retries,
            Duration::from_millis(settings.base_delay_ms),
            settings.backoff_factor,
        )
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, 1.0)
    }

    /// Policy for click interactions: one retry after 300 ms
    pub fn for_clicks() -> Self {
        Self::new(1, Duration::from_millis(300), 2.0)
    }

    /// Delay slept before retry number `attempt` (zero-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let seconds = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }

    /// Runs an operation under this policy
    ///
    /// # Arguments
    ///
    /// * `operation` - Label used in log messages
    /// * `op` - Produces a fresh future for every attempt
    ///
    /// # Returns
    ///
    /// The first successful result, or the error of the last attempt unchanged
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> ToolResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ToolResult<T>>,
    {
        let mut attempt = 0u32;

        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!("{} succeeded after {} retr(ies)", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if attempt < self.retries => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        operation,
                        attempt + 1,
                        self.retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if self.retries > 0 {
                        tracing::warn!(
                            "{} failed after {} attempt(s): {}",
                            operation,
                            attempt + 1,
                            e
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}
