use crate::config::{Config, RetryConfig};
use crate::error::PersistenceError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::warn;

/// Execute an async operation with jittered exponential backoff.
///
/// Errors for which `is_retryable` returns false are returned immediately.
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: &RetryConfig,
    is_retryable: fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempts = 0;
    let mut backoff_ms = config.backoff_base_ms;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !is_retryable(&e) => return Err(e),
            Err(e) if attempts >= config.max_attempts => {
                warn!("All {} attempts failed: {}", attempts, e);
                return Err(e);
            }
            Err(e) => {
                // Jittered backoff: base * 2^attempt + random(0..base)
                let jitter = rand::random::<u64>() % config.backoff_base_ms.max(1);
                let delay = Duration::from_millis(backoff_ms + jitter);

                warn!(
                    "Attempt {} failed: {}. Retrying in {:?}...",
                    attempts, e, delay
                );

                sleep(delay).await;
                backoff_ms = backoff_ms.saturating_mul(2);
            }
        }
    }
}

impl PersistenceError {
    /// IO failures and timeouts may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, PersistenceError::Io(_) | PersistenceError::Timeout(_))
    }
}

/// Retry and timeout policy applied to every gateway call
#[derive(Debug, Clone)]
pub struct CallPolicy {
    pub retry: RetryConfig,
    pub timeout: Duration,
}

impl CallPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: config.retry.clone(),
            timeout: Duration::from_secs(config.timeout_sec),
        }
    }

    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, PersistenceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PersistenceError>>,
    {
        let limit = self.timeout;
        retry_with_backoff(&self.retry, PersistenceError::is_retryable, || {
            let attempt = operation();
            async move {
                match timeout(limit, attempt).await {
                    Ok(result) => result,
                    Err(_) => Err(PersistenceError::Timeout(limit)),
                }
            }
        })
        .await
    }
}
