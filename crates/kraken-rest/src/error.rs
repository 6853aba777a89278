//! Error types for REST API operations

use kraken_auth::AuthError;
use kraken_types::error_codes::{KrakenApiError, RecoveryStrategy};
use kraken_types::tolerant::{snippet, snippet_at};
use kraken_types::DecodeError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Failures below the API layer: the request never produced an envelope
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or protocol failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Non-2xx status whose body was not a Kraken envelope
    #[error("HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// Envelope carrying a non-empty `error` list
///
/// Kraken may still send a `result` next to the errors; it is kept as raw JSON
/// and can be decoded on demand with [`ApiFailure::partial_result`].
#[derive(Debug, Clone)]
pub struct ApiFailure {
    /// First error, parsed
    pub error: KrakenApiError,
    /// Every error string, in upstream order
    pub errors: Vec<String>,
    /// `result` payload sent alongside the errors
    pub partial: Option<Value>,
}

impl ApiFailure {
    pub fn new(errors: Vec<String>, partial: Option<Value>) -> Self {
        let error = errors
            .first()
            .map(|e| KrakenApiError::parse(e))
            .unwrap_or_else(|| KrakenApiError::parse("Unknown error"));

        Self {
            error,
            errors,
            partial,
        }
    }

    /// Every error string parsed into a structured error
    pub fn parsed(&self) -> Vec<KrakenApiError> {
        KrakenApiError::parse_many(&self.errors)
    }

    /// Decode the partial result into the type the call would have returned
    pub fn partial_result<T: DeserializeOwned>(&self) -> RestResult<Option<T>> {
        match &self.partial {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| RestError::decode("partial result", value.to_string().as_bytes(), e)),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.errors.join(", "))
    }
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Credentials could not be built
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// Network, timeout or undecodable non-2xx response
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Body was not JSON, or a field was outside its accepted shapes
    #[error("Failed to decode {context}: {message} (body: {snippet})")]
    Decode {
        /// Endpoint path or field name
        context: String,
        /// Truncated raw input
        snippet: String,
        /// Parser message
        message: String,
    },

    /// API returned an error
    #[error("API error: {0}")]
    Api(ApiFailure),

    /// Rejected before anything was sent
    #[error("Invalid request: {0}")]
    Validation(String),
}

impl From<DecodeError> for RestError {
    fn from(e: DecodeError) -> Self {
        Self::Decode {
            context: e.field.to_string(),
            snippet: e.raw,
            message: e.message,
        }
    }
}

impl RestError {
    /// Create an API error from error strings returned by Kraken
    pub fn from_api_errors(errors: Vec<String>) -> Self {
        Self::Api(ApiFailure::new(errors, None))
    }

    pub(crate) fn decode(context: &str, raw: &[u8], e: impl fmt::Display) -> Self {
        Self::Decode {
            context: context.to_string(),
            snippet: snippet(raw),
            message: e.to_string(),
        }
    }

    /// Decode failure from a JSON parse of `raw`, snippet taken around the parser position
    pub(crate) fn json(context: &str, raw: &[u8], e: &serde_json::Error) -> Self {
        Self::Decode {
            context: context.to_string(),
            snippet: snippet_at(raw, e.line(), e.column()),
            message: e.to_string(),
        }
    }

    /// The API failure, if this is one
    pub fn api_failure(&self) -> Option<&ApiFailure> {
        match self {
            Self::Api(failure) => Some(failure),
            _ => None,
        }
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::Api(failure) => failure.error.recovery_strategy(),
            Self::Transport(TransportError::Status { status: 429, .. }) => {
                RecoveryStrategy::rate_limit_backoff()
            }
            Self::Transport(TransportError::Status { status, .. }) if *status >= 500 => {
                RecoveryStrategy::service_retry()
            }
            Self::Transport(TransportError::Timeout) | Self::Transport(TransportError::Http(_)) => {
                RecoveryStrategy::service_retry()
            }
            Self::Transport(TransportError::Status { .. }) => RecoveryStrategy::Fatal,
            Self::Auth(_) | Self::AuthRequired => RecoveryStrategy::Fatal,
            Self::Decode { .. } | Self::Validation(_) => RecoveryStrategy::Fatal,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api(failure) => failure.parsed().iter().any(|e| e.is_rate_limit()),
            Self::Transport(TransportError::Status { status, .. }) => *status == 429,
            _ => false,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
