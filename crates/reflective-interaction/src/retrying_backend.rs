//! Retry and timeout decorator for text backends.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reflective_core::config::GenerationSettings;
use reflective_core::{BackendError, CompletionRequest, TextBackend};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// How a [`RetryingBackend`] treats failed attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each later one
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Deadline for a single attempt
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: MAX_BACKOFF,
            attempt_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: settings.retry_base_delay(),
            max_delay: MAX_BACKOFF,
            attempt_timeout: Some(settings.request_timeout()),
        }
    }

    /// No retries, no timeout.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            attempt_timeout: None,
        }
    }

    /// Delay before retry number `retry` (0-based). A server-provided
    /// `Retry-After` wins over the computed backoff.
    fn delay_for(&self, retry: u32, error: &BackendError) -> Duration {
        if let Some(retry_after) = error.retry_after() {
            return retry_after.min(self.max_delay);
        }

        let factor = 2u32.saturating_pow(retry);
        let backoff = self.base_delay.saturating_mul(factor).min(self.max_delay);
        let jitter_ms = (backoff.as_millis() / 4) as u64;
        let jitter = rand::thread_rng().gen_range(0..=jitter_ms);
        backoff + Duration::from_millis(jitter)
    }
}

/// Wraps a backend with per-attempt timeouts and bounded exponential backoff.
///
/// Only errors reporting `is_retryable()` are retried; everything else is
/// returned after the first attempt.
pub struct RetryingBackend<B> {
    inner: B,
    policy: RetryPolicy,
}

impl<B: TextBackend> RetryingBackend<B> {
    pub fn new(inner: B, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn attempt(&self, request: CompletionRequest) -> Result<String, BackendError> {
        match self.policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, self.inner.complete(request))
                .await
                .unwrap_or(Err(BackendError::Timeout(limit))),
            None => self.inner.complete(request).await,
        }
    }
}

#[async_trait]
impl<B: TextBackend> TextBackend for RetryingBackend<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let mut retry = 0;
        loop {
            match self.attempt(request.clone()).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && retry < self.policy.max_retries => {
                    let delay = self.policy.delay_for(retry, &err);
                    tracing::warn!(
                        backend = self.inner.name(),
                        attempt = retry + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying backend request: {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails with `error` for the first `failures` calls, then echoes the user message.
    struct FlakyBackend {
        failures: usize,
        error: BackendError,
        calls: Arc<AtomicUsize>,
        latency: Duration,
    }

    impl FlakyBackend {
        fn new(failures: usize, error: BackendError) -> Self {
            Self {
                failures,
                error,
                calls: Arc::new(AtomicUsize::new(0)),
                latency: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl TextBackend for FlakyBackend {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if call < self.failures {
                Err(self.error.clone())
            } else {
                Ok(request.user_message)
            }
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            attempt_timeout: None,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let inner = FlakyBackend::new(2, BackendError::transport("connection reset", true));
        let calls = inner.calls.clone();
        let backend = RetryingBackend::new(inner, fast_policy(2));

        let text = backend
            .complete(CompletionRequest::new("s", "hello"))
            .await
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let inner = FlakyBackend::new(10, BackendError::transport("connection reset", true));
        let calls = inner.calls.clone();
        let backend = RetryingBackend::new(inner, fast_policy(1));

        let err = backend
            .complete(CompletionRequest::new("s", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Transport { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_errors_return_immediately() {
        let auth = BackendError::Http {
            status_code: 401,
            message: "Invalid API key".into(),
            is_retryable: false,
            retry_after: None,
        };
        let inner = FlakyBackend::new(1, auth.clone());
        let calls = inner.calls.clone();
        let backend = RetryingBackend::new(inner, fast_policy(3));

        let err = backend
            .complete(CompletionRequest::new("s", "hello"))
            .await
            .unwrap_err();
        assert_eq!(err, auth);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attempt_timeout_becomes_backend_error() {
        let mut inner = FlakyBackend::new(0, BackendError::EmptyResponse);
        inner.latency = Duration::from_millis(200);
        let policy = RetryPolicy {
            attempt_timeout: Some(Duration::from_millis(10)),
            ..fast_policy(0)
        };
        let backend = RetryingBackend::new(inner, policy);

        let err = backend
            .complete(CompletionRequest::new("s", "hello"))
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::Timeout(Duration::from_millis(10)));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let policy = RetryPolicy {
            max_delay: Duration::from_secs(10),
            ..RetryPolicy::default()
        };
        let throttled = BackendError::Http {
            status_code: 429,
            message: "slow down".into(),
            is_retryable: true,
            retry_after: Some(Duration::from_secs(4)),
        };
        assert_eq!(policy.delay_for(0, &throttled), Duration::from_secs(4));

        let delay = policy.delay_for(2, &BackendError::Timeout(Duration::from_secs(1)));
        assert!(delay >= Duration::from_millis(2000));
        assert!(delay <= Duration::from_millis(2500));
    }
}
