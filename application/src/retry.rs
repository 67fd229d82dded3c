//! Retry logic for provider operations
//!
//! Exponential backoff for transient failures. Provider connect and
//! discover calls go through a subprocess spawn and a stdio handshake,
//! both of which can fail transiently; wrapping them here keeps the
//! retry policy out of each call site.

use std::future::Future;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Ceiling on the backoff delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Config with no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier.max(1.0);
        self
    }

    /// Delay before the retry following attempt `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let clamped = base.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(clamped as u64)
    }
}

/// Run `operation` up to `config.max_attempts` times.
///
/// `should_retry` inspects the error after each failed attempt; a
/// rejected error is returned immediately without further attempts or
/// sleeping. Pass `|_| true` for unconditional retries.
pub async fn with_retry<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    should_retry: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                let last_attempt = attempt + 1 >= config.max_attempts;
                if last_attempt || !should_retry(&error) {
                    return Err(error);
                }
                let delay = config.delay_for_attempt(attempt);
                tracing::warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_config(attempts: usize) -> RetryConfig {
        RetryConfig::default()
            .with_max_attempts(attempts)
            .with_initial_delay(Duration::from_millis(1))
    }

    #[test]
    fn test_delay_grows_exponentially_up_to_max() {
        let config = RetryConfig {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
            backoff_multiplier: 2.0,
        };
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        // 400ms would exceed the ceiling.
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<&str, String> =
            with_retry(&fast_config(3), "connect", |_| true, move || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok("connected")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<(), String> =
            with_retry(&fast_config(3), "connect", |_| true, move || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("still down".to_string())
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "still down");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_predicate_stops_permanent_errors_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<(), String> = with_retry(
            &fast_config(5),
            "connect",
            |e: &String| e != "permanent",
            move || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("permanent".to_string())
                }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_retry_config_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let _: Result<(), String> =
            with_retry(&RetryConfig::no_retry(), "discover", |_| true, move || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("boom".to_string())
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
