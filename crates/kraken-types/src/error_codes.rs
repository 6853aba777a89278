//! Kraken REST error code mapping with recovery strategies
//!
//! Kraken reports failures as strings shaped `"<Category>:<Message>[:<Detail>]"`,
//! e.g. `"EGeneral:Invalid arguments:volume"`. This module parses those strings
//! into a category, a known code (when recognized), and a suggested recovery.
//! Acting on the suggestion is left to the caller.

use std::fmt;
use std::time::Duration;

/// Recovery strategy suggested for an API error
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecoveryStrategy {
    /// Exponential backoff before retrying
    Backoff {
        initial_ms: u64,
        max_ms: u64,
    },
    /// Retry after a fixed delay
    Retry { delay_ms: u64, max_attempts: u32 },
    /// Cannot be fixed by retrying
    Fatal,
    /// Needs the account holder to act (fund the account, etc.)
    UserAction { message: &'static str },
    /// Unknown error, needs investigation
    #[default]
    Manual,
}

impl RecoveryStrategy {
    /// Default backoff for rate limit errors
    pub fn rate_limit_backoff() -> Self {
        Self::Backoff {
            initial_ms: 1_000,
            max_ms: 60_000,
        }
    }

    /// Default retry for transient service errors
    pub fn service_retry() -> Self {
        Self::Retry {
            delay_ms: 1_000,
            max_attempts: 3,
        }
    }

    /// Delay before the first retry, if retrying makes sense
    pub fn initial_delay(&self) -> Option<Duration> {
        match self {
            Self::Backoff { initial_ms, .. } => Some(Duration::from_millis(*initial_ms)),
            Self::Retry { delay_ms, .. } => Some(Duration::from_millis(*delay_ms)),
            _ => None,
        }
    }

    /// Check if this strategy allows retry
    pub fn allows_retry(&self) -> bool {
        matches!(self, Self::Backoff { .. } | Self::Retry { .. })
    }
}

/// Kraken error categories (the prefix before the first colon)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// `EAPI:*` - authentication and request framing
    Api,
    /// `EGeneral:*`
    General,
    /// `EService:*` - availability
    Service,
    /// `EOrder:*` - order placement and management
    Order,
    /// `EFunding:*` - deposits and withdrawals
    Funding,
    /// `EQuery:*`
    Query,
    /// `ETrade:*`
    Trade,
    /// Anything else
    Unknown,
}

impl ErrorCategory {
    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "EAPI" => Self::Api,
            "EGeneral" => Self::General,
            "EService" => Self::Service,
            "EOrder" => Self::Order,
            "EFunding" => Self::Funding,
            "EQuery" => Self::Query,
            "ETrade" => Self::Trade,
            _ => Self::Unknown,
        }
    }
}

/// Known Kraken REST error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KrakenErrorCode {
    RateLimitExceeded,
    InvalidKey,
    InvalidSignature,
    InvalidNonce,
    BadRequest,
    FeatureDisabled,

    InvalidArguments,
    PermissionDenied,
    UnknownMethod,
    TemporaryLockout,
    TooManyRequests,
    InternalError,

    ServiceUnavailable,
    ServiceBusy,
    MarketCancelOnly,
    MarketPostOnly,
    DeadlineElapsed,

    UnknownAssetPair,
    UnknownAsset,

    InsufficientFunds,
    InsufficientMargin,
    OrderMinimumNotMet,
    CostMinimumNotMet,
    TickSizeCheckFailed,
    OrdersLimitExceeded,
    OrderRateLimitExceeded,
    PositionsLimitExceeded,
    UnknownOrder,
    InvalidPrice,
    PostOnlyOrder,

    UnknownWithdrawKey,
    InvalidFundingAmount,
    FundingTooSmall,
    FundingTooLarge,
    UnknownFundingAsset,
    MaxFeeExceeded,

    TradeLocked,
    TradeInvalidRequest,
}

/// Error string prefixes, matched longest-first so detail suffixes still resolve
const KNOWN_CODES: &[(&str, KrakenErrorCode)] = &[
    ("EAPI:Rate limit exceeded", KrakenErrorCode::RateLimitExceeded),
    ("EAPI:Invalid key", KrakenErrorCode::InvalidKey),
    ("EAPI:Invalid signature", KrakenErrorCode::InvalidSignature),
    ("EAPI:Invalid nonce", KrakenErrorCode::InvalidNonce),
    ("EAPI:Bad request", KrakenErrorCode::BadRequest),
    ("EAPI:Feature disabled", KrakenErrorCode::FeatureDisabled),
    ("EGeneral:Invalid arguments", KrakenErrorCode::InvalidArguments),
    ("EGeneral:Permission denied", KrakenErrorCode::PermissionDenied),
    ("EGeneral:Unknown method", KrakenErrorCode::UnknownMethod),
    ("EGeneral:Temporary lockout", KrakenErrorCode::TemporaryLockout),
    ("EGeneral:Too many requests", KrakenErrorCode::TooManyRequests),
    ("EGeneral:Internal error", KrakenErrorCode::InternalError),
    ("EService:Unavailable", KrakenErrorCode::ServiceUnavailable),
    ("EService:Busy", KrakenErrorCode::ServiceBusy),
    ("EService:Market in cancel_only mode", KrakenErrorCode::MarketCancelOnly),
    ("EService:Market in post_only mode", KrakenErrorCode::MarketPostOnly),
    ("EService:Deadline elapsed", KrakenErrorCode::DeadlineElapsed),
    ("EQuery:Unknown asset pair", KrakenErrorCode::UnknownAssetPair),
    ("EQuery:Unknown asset", KrakenErrorCode::UnknownAsset),
    ("EOrder:Insufficient funds", KrakenErrorCode::InsufficientFunds),
    ("EOrder:Insufficient margin", KrakenErrorCode::InsufficientMargin),
    ("EOrder:Order minimum not met", KrakenErrorCode::OrderMinimumNotMet),
    ("EOrder:Cost minimum not met", KrakenErrorCode::CostMinimumNotMet),
    ("EOrder:Tick size check failed", KrakenErrorCode::TickSizeCheckFailed),
    ("EOrder:Orders limit exceeded", KrakenErrorCode::OrdersLimitExceeded),
    ("EOrder:Rate limit exceeded", KrakenErrorCode::OrderRateLimitExceeded),
    ("EOrder:Positions limit exceeded", KrakenErrorCode::PositionsLimitExceeded),
    ("EOrder:Unknown order", KrakenErrorCode::UnknownOrder),
    ("EOrder:Invalid price", KrakenErrorCode::InvalidPrice),
    ("EOrder:Post only order", KrakenErrorCode::PostOnlyOrder),
    ("EFunding:Unknown withdraw key", KrakenErrorCode::UnknownWithdrawKey),
    ("EFunding:Invalid amount", KrakenErrorCode::InvalidFundingAmount),
    ("EFunding:Too small", KrakenErrorCode::FundingTooSmall),
    ("EFunding:Too large", KrakenErrorCode::FundingTooLarge),
    ("EFunding:Unknown asset", KrakenErrorCode::UnknownFundingAsset),
    ("EFunding:Max fee exceeded", KrakenErrorCode::MaxFeeExceeded),
    ("ETrade:Locked", KrakenErrorCode::TradeLocked),
    ("ETrade:Invalid request", KrakenErrorCode::TradeInvalidRequest),
];

impl KrakenErrorCode {
    /// Resolve a raw Kraken error string to a known code
    ///
    /// Matching is by prefix, so `"EGeneral:Invalid arguments:volume"` resolves
    /// to [`KrakenErrorCode::InvalidArguments`]. The longest known prefix wins.
    pub fn parse(error: &str) -> Option<Self> {
        KNOWN_CODES
            .iter()
            .filter(|(prefix, _)| {
                error.starts_with(prefix)
                    && matches!(error.as_bytes().get(prefix.len()), None | Some(b':'))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, code)| *code)
    }

    /// Suggested recovery for this code
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::RateLimitExceeded | Self::TooManyRequests | Self::OrderRateLimitExceeded => {
                RecoveryStrategy::rate_limit_backoff()
            }
            Self::TemporaryLockout => RecoveryStrategy::Backoff {
                initial_ms: 15_000,
                max_ms: 300_000,
            },
            // A fresh nonce is issued on every call
            Self::InvalidNonce => RecoveryStrategy::Retry {
                delay_ms: 0,
                max_attempts: 1,
            },
            Self::ServiceUnavailable
            | Self::ServiceBusy
            | Self::DeadlineElapsed
            | Self::InternalError => RecoveryStrategy::service_retry(),
            Self::InsufficientFunds => RecoveryStrategy::UserAction {
                message: "Deposit funds or reduce the order size",
            },
            Self::InsufficientMargin => RecoveryStrategy::UserAction {
                message: "Add margin collateral or reduce leverage",
            },
            Self::UnknownWithdrawKey => RecoveryStrategy::UserAction {
                message: "Create the withdrawal key in account settings",
            },
            _ => RecoveryStrategy::Fatal,
        }
    }
}

/// Parsed Kraken API error with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrakenApiError {
    /// The original error string from Kraken
    pub raw: String,
    /// Parsed error code (if recognized)
    pub code: Option<KrakenErrorCode>,
    /// Error category
    pub category: ErrorCategory,
    /// Everything after the category prefix
    pub message: String,
}

impl KrakenApiError {
    /// Parse a Kraken error string into a structured error
    pub fn parse(error: &str) -> Self {
        let (category, message) = match error.split_once(':') {
            Some((prefix, rest)) => (ErrorCategory::from_prefix(prefix), rest.trim().to_string()),
            None => (ErrorCategory::Unknown, error.to_string()),
        };

        Self {
            raw: error.to_string(),
            code: KrakenErrorCode::parse(error),
            category,
            message,
        }
    }

    /// Parse every error in an envelope's error list
    pub fn parse_many(errors: &[String]) -> Vec<Self> {
        errors.iter().map(|e| Self::parse(e)).collect()
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        self.code
            .map(|c| c.recovery_strategy())
            .unwrap_or_default()
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self.code,
            Some(KrakenErrorCode::RateLimitExceeded)
                | Some(KrakenErrorCode::TooManyRequests)
                | Some(KrakenErrorCode::OrderRateLimitExceeded)
        )
    }

    /// Check if the credentials or signature were rejected
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.code,
            Some(KrakenErrorCode::InvalidKey)
                | Some(KrakenErrorCode::InvalidSignature)
                | Some(KrakenErrorCode::PermissionDenied)
        )
    }
}

impl fmt::Display for KrakenApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
