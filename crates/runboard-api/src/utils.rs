//! Retry helper for idempotent reads against the CI provider

use std::time::Duration;

use crate::{
    PanelError,
    PanelResult,
};

/// Retry policy configuration
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_retries: usize,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Whether to use exponential backoff
    pub exponential_backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            exponential_backoff: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, initial_delay: Duration, exponential_backoff: bool) -> Self {
        Self {
            max_retries,
            initial_delay,
            exponential_backoff,
        }
    }

    /// A policy that runs the operation exactly once
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, false)
    }

    /// Executes an operation, retrying network and API errors.
    ///
    /// Not used for the dispatch call: a trigger is sent once.
    pub async fn retry<F, Fut, T>(&self, operation: F) -> PanelResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = PanelResult<T>>,
    {
        let mut delay = self.initial_delay;
        let mut last_error = None;
        let attempts = self.max_retries.max(1);

        for attempt in 0..attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < attempts - 1 => match &e {
                    PanelError::NetworkError(_) | PanelError::ApiError(_) => {
                        tracing::debug!(attempt = attempt + 1, error = %e, "Retrying request");
                        last_error = Some(e);
                        tokio::time::sleep(delay).await;
                        if self.exponential_backoff {
                            delay *= 2;
                        }
                        continue;
                    }
                    _ => return Err(e),
                },
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| PanelError::NetworkError("Max retries exceeded".to_string())))
    }
}
