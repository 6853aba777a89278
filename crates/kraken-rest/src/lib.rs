//! REST API client for Kraken cryptocurrency exchange
//!
//! This crate provides a typed REST client for Kraken, covering market data,
//! account management, order execution, funding and staking.
//!
//! # Features
//!
//! - **Market Data**: Ticker, orderbook, OHLC, recent trades and spreads
//! - **Account**: Balances, trade history, open/closed orders, ledgers
//! - **Trading**: Place, batch, edit and cancel orders
//! - **Funding**: Deposits, withdrawals and wallet transfers
//! - **Staking**: Stakeable assets, stake/unstake, transaction history
//!
//! # Authentication
//!
//! Private endpoints require API credentials. Every private request is signed
//! with HMAC-SHA512 over the path and a SHA-256 digest of nonce and body, and
//! carries a strictly increasing nonce.
//!
//! # Responses
//!
//! Kraken wraps every result in `{"error": [...], "result": ...}`. A non-empty
//! error list fails the call even on HTTP 200; any result sent with the errors
//! is kept on [`ApiFailure::partial`].
//!
//! # Example
//!
//! ```no_run
//! use kraken_rest::{AccountData, Credentials, KrakenRestClient, MarketData};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = KrakenRestClient::new()?;
//!     let ticker = client.ticker(&["XBTUSD"]).await?;
//!     println!("BTC/USD: {:?}", ticker);
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = KrakenRestClient::with_credentials(creds)?;
//!     let balance = auth_client.balance().await?;
//!     println!("Balances: {:?}", balance.non_zero());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Retries
//!
//! Public `GET` requests can be retried per [`RetryPolicy`]. Signed `POST`s are
//! never re-sent by the client since their nonce has been consumed.

pub mod client;
pub mod config;
pub mod constants;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod request;
pub mod retry;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::KrakenRestClient;
pub use config::ClientConfig;
pub use envelope::Envelope;
pub use error::{ApiFailure, RestError, RestResult, TransportError};
pub use request::FormParams;
pub use retry::{RetryConfig, RetryPolicy, RetryingTransport};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

// Capability traits
pub use endpoints::{AccountData, Funding, KrakenApi, MarketData, Staking, Trading};

// Re-export endpoint-specific types
pub use endpoints::account::{
    ClosedOrdersResult, ExtendedBalance, LedgersResult, OpenOrdersResult, TradeBalance,
    TradeVolume, TradesHistoryResult, WebSocketsToken,
};
pub use endpoints::funding::{DepositAddress, DepositMethod, ReferenceId, TransferStatus, WithdrawInfo};
pub use endpoints::market::{AssetPairInfo, OhlcCandle, OhlcResult, ServerTime, SystemStatus};
pub use endpoints::staking::{StakeResult, StakingAsset, StakingTransaction};
pub use endpoints::trading::{
    AddOrderResult, BatchCancelResult, BatchOrderEntry, BatchOrderResult, CancelOrderResult,
    EditOrderResult,
};
pub use types::{
    // Market data
    OrderbookData, TickerInfo,
    // Account
    BalanceInfo, OrderInfo,
    // Requests
    ClosedOrdersRequest, EditOrderRequest, LedgersRequest, OrderRequest, TradesHistoryRequest,
};

// Auth and shared types, so callers need only this crate
pub use kraken_auth::{Credentials, CounterNonce, MillisNonce, NonceSource, SignedRequest};
pub use kraken_types::{OrderFlag, OrderSide, OrderType, TimeInForce};
