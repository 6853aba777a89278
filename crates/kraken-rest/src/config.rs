//! Client configuration

use kraken_auth::{AuthError, Credentials, NonceSource, API_KEY_ENV, PRIVATE_KEY_ENV};
use std::sync::Arc;

use crate::constants::{API_URL_ENV, BASE_URL, DEFAULT_TIMEOUT_SECS, TIMEOUT_ENV};
use crate::error::{RestError, RestResult};
use crate::retry::RetryPolicy;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Retry policy for public (`GET`) requests
    pub retry: RetryPolicy,
    /// Nonce source; the process-wide one when unset
    pub nonce_source: Option<Arc<dyn NonceSource>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            base_url: BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            retry: RetryPolicy::default(),
            nonce_source: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration from the process environment
    ///
    /// | Variable | Effect |
    /// |---|---|
    /// | `KRAKEN_API_KEY` + `KRAKEN_PRIVATE_KEY` | credentials (both or neither) |
    /// | `KRAKEN_API_URL` | base URL |
    /// | `KRAKEN_TIMEOUT_SECS` | request timeout |
    pub fn from_env() -> RestResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RestResult<Self> {
        let mut config = Self::default();

        match (lookup(API_KEY_ENV), lookup(PRIVATE_KEY_ENV)) {
            (Some(key), Some(secret)) => config.credentials = Some(Credentials::new(key, secret)?),
            (None, None) => {}
            (Some(_), None) => return Err(AuthError::EnvVarNotSet(PRIVATE_KEY_ENV.to_string()).into()),
            (None, Some(_)) => return Err(AuthError::EnvVarNotSet(API_KEY_ENV.to_string()).into()),
        }

        if let Some(url) = lookup(API_URL_ENV) {
            config = config.with_base_url(url);
        }

        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let secs = secs.trim().parse().map_err(|_| {
                RestError::Validation(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?;
            config.timeout_secs = secs;
        }

        Ok(config)
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Point the client at another server (mock, proxy)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the retry policy for public requests
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use a dedicated nonce source instead of the process-wide one
    pub fn with_nonce_source(mut self, nonce_source: Arc<dyn NonceSource>) -> Self {
        self.nonce_source = Some(nonce_source);
        self
    }
}
