//! Retry policies applied at the transport layer
//!
//! Only `GET` requests are ever retried. A signed `POST` carries a nonce that
//! Kraken accepts once, so re-sending it would at best be rejected and at
//! worst duplicate an order.

use async_trait::async_trait;
use reqwest::Method;
use std::time::Duration;
use tracing::warn;

use crate::error::TransportError;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Retry policy for public requests
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Never retry
    #[default]
    None,
    /// Retry transport failures, 429 and 502/503/504 with backoff
    Idempotent,
    /// User-provided retry settings
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// Settings to use for a request with `method`, if it may be retried at all
    pub fn config_for(&self, method: &Method) -> Option<RetryConfig> {
        if *method != Method::GET {
            return None;
        }
        match self {
            Self::None => None,
            Self::Idempotent => Some(RetryConfig::idempotent()),
            Self::Custom(config) => Some(config.clone()),
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request)
    pub max_retries: u32,
    /// Initial delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: f64,
    /// Whether to add jitter to the delay
    pub jitter: bool,
    /// HTTP status codes that trigger a retry
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// The default config for idempotent (GET) requests
    pub fn idempotent() -> Self {
        Self {
            retryable_statuses: vec![429, 502, 503, 504],
            ..Self::default()
        }
    }

    /// Calculate delay for a given attempt (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base =
            self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }

    /// Whether an outcome is worth another attempt
    pub fn should_retry(&self, outcome: &Result<HttpResponse, TransportError>) -> bool {
        match outcome {
            Ok(response) => self.retryable_statuses.contains(&response.status),
            Err(TransportError::Http(_)) | Err(TransportError::Timeout) => true,
            Err(TransportError::Status { status, .. }) => self.retryable_statuses.contains(status),
        }
    }
}

/// Wraps a transport and re-sends idempotent requests per a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let Some(config) = self.policy.config_for(&request.method) else {
            return self.inner.execute(request).await;
        };

        let mut attempt = 0;
        loop {
            let outcome = self.inner.execute(request.clone()).await;
            if attempt >= config.max_retries || !config.should_retry(&outcome) {
                return outcome;
            }

            let delay = config.delay_for_attempt(attempt);
            warn!(
                url = %request.url,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "Retrying request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with 503 until `failures` calls have been made
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Transport for Flaky {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Ok(HttpResponse {
                    status: 503,
                    headers: Vec::new(),
                    body: b"busy".to_vec(),
                })
            } else {
                Ok(HttpResponse::json(r#"{"error":[],"result":{}}"#))
            }
        }
    }

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_factor: 2.0,
            jitter: false,
            retryable_statuses: vec![503],
        }
    }

    #[test]
    fn test_retry_policy_default_is_none() {
        assert!(matches!(RetryPolicy::default(), RetryPolicy::None));
    }

    #[test]
    fn test_retry_config_idempotent_includes_429() {
        let config = RetryConfig::idempotent();
        assert!(config.retryable_statuses.contains(&429));
        assert!(config.retryable_statuses.contains(&502));
        assert!(config.retryable_statuses.contains(&503));
        assert!(config.retryable_statuses.contains(&504));
    }

    #[test]
    fn test_post_is_never_retried() {
        assert!(RetryPolicy::Idempotent.config_for(&Method::POST).is_none());
        assert!(RetryPolicy::Idempotent.config_for(&Method::GET).is_some());
        assert!(RetryPolicy::None.config_for(&Method::GET).is_none());
    }

    #[test]
    fn test_retry_config_delay_for_attempt_no_jitter() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            jitter: false,
            ..RetryConfig::default()
        };
        assert_eq!(config.delay_for_attempt(0).as_millis(), 100);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 200);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 400);
    }

    #[test]
    fn test_retry_config_delay_caps_at_max() {
        let config = RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(2000),
            backoff_factor: 10.0,
            jitter: false,
            retryable_statuses: vec![],
        };
        assert_eq!(config.delay_for_attempt(3).as_millis(), 2000);
    }

    #[tokio::test]
    async fn test_get_retried_until_success() {
        let transport = RetryingTransport::new(
            Flaky {
                failures: 2,
                calls: AtomicU32::new(0),
            },
            RetryPolicy::Custom(fast_config()),
        );

        let response = transport
            .execute(HttpRequest::get("https://example.test/0/public/Time"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_response() {
        let transport = RetryingTransport::new(
            Flaky {
                failures: 10,
                calls: AtomicU32::new(0),
            },
            RetryPolicy::Custom(fast_config()),
        );

        let response = transport
            .execute(HttpRequest::get("https://example.test/0/public/Time"))
            .await
            .unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_signed_post_sent_once() {
        let transport = RetryingTransport::new(
            Flaky {
                failures: 10,
                calls: AtomicU32::new(0),
            },
            RetryPolicy::Custom(fast_config()),
        );

        let response = transport
            .execute(HttpRequest::post(
                "https://example.test/0/private/Balance",
                "nonce=1",
            ))
            .await
            .unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 1);
    }
}
