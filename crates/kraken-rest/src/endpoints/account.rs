//! Private account endpoints
//!
//! These endpoints require authentication.

use async_trait::async_trait;
use kraken_types::tolerant::string_list;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::instrument;

use crate::client::KrakenRestClient;
use crate::constants::private;
use crate::error::{RestError, RestResult};
use crate::request::FormParams;
use crate::types::{
    BalanceInfo, ClosedOrdersRequest, LedgersRequest, OrderInfo, TradesHistoryRequest,
};

/// Private account data endpoints
#[async_trait]
pub trait AccountData: Send + Sync {
    /// Get account balance
    async fn balance(&self) -> RestResult<BalanceInfo>;

    /// Get extended balance with hold amounts
    async fn extended_balance(&self) -> RestResult<HashMap<String, ExtendedBalance>>;

    /// Get trade balance (margin info)
    ///
    /// # Arguments
    /// * `asset` - Base asset for calculations (default: "ZUSD")
    async fn trade_balance(&self, asset: Option<&str>) -> RestResult<TradeBalance>;

    /// Get open orders
    ///
    /// # Arguments
    /// * `trades` - Include trade ids
    /// * `userref` - Filter by user reference
    async fn open_orders(&self, trades: bool, userref: Option<i32>)
        -> RestResult<OpenOrdersResult>;

    /// Get closed orders (50 per page)
    async fn closed_orders(&self, request: &ClosedOrdersRequest) -> RestResult<ClosedOrdersResult>;

    /// Look up specific orders by transaction ID
    async fn query_orders(
        &self,
        txids: &[&str],
        trades: bool,
    ) -> RestResult<HashMap<String, OrderInfo>>;

    /// Get trade history (50 per page)
    async fn trades_history(
        &self,
        request: &TradesHistoryRequest,
    ) -> RestResult<TradesHistoryResult>;

    /// Get ledger entries (50 per page)
    async fn ledgers(&self, request: &LedgersRequest) -> RestResult<LedgersResult>;

    /// Get 30-day volume and fee tiers for `pairs`
    async fn trade_volume(&self, pairs: &[&str]) -> RestResult<TradeVolume>;

    /// Get a token for private WebSocket channels
    async fn websockets_token(&self) -> RestResult<WebSocketsToken>;

    /// Download a finished export report as raw bytes (a zip archive)
    async fn retrieve_export(&self, id: &str) -> RestResult<Vec<u8>>;
}

#[async_trait]
impl AccountData for KrakenRestClient {
    #[instrument(skip(self))]
    async fn balance(&self) -> RestResult<BalanceInfo> {
        self.private_post(private::BALANCE, &FormParams::new()).await
    }

    #[instrument(skip(self))]
    async fn extended_balance(&self) -> RestResult<HashMap<String, ExtendedBalance>> {
        self.private_post(private::BALANCE_EX, &FormParams::new()).await
    }

    #[instrument(skip(self))]
    async fn trade_balance(&self, asset: Option<&str>) -> RestResult<TradeBalance> {
        let mut params = FormParams::new();
        params.push_opt("asset", asset);
        self.private_post(private::TRADE_BALANCE, &params).await
    }

    #[instrument(skip(self))]
    async fn open_orders(
        &self,
        trades: bool,
        userref: Option<i32>,
    ) -> RestResult<OpenOrdersResult> {
        let mut params = FormParams::new();
        params.push_flag("trades", trades).push_opt("userref", userref);
        self.private_post(private::OPEN_ORDERS, &params).await
    }

    #[instrument(skip(self, request))]
    async fn closed_orders(&self, request: &ClosedOrdersRequest) -> RestResult<ClosedOrdersResult> {
        self.private_post(private::CLOSED_ORDERS, &request.to_params())
            .await
    }

    #[instrument(skip(self), fields(count = txids.len()))]
    async fn query_orders(
        &self,
        txids: &[&str],
        trades: bool,
    ) -> RestResult<HashMap<String, OrderInfo>> {
        if txids.is_empty() {
            return Err(RestError::Validation("Empty txid list".to_string()));
        }

        let mut params = FormParams::new();
        params.push_list("txid", txids).push_flag("trades", trades);
        self.private_post(private::QUERY_ORDERS, &params).await
    }

    #[instrument(skip(self, request))]
    async fn trades_history(
        &self,
        request: &TradesHistoryRequest,
    ) -> RestResult<TradesHistoryResult> {
        self.private_post(private::TRADES_HISTORY, &request.to_params())
            .await
    }

    #[instrument(skip(self, request))]
    async fn ledgers(&self, request: &LedgersRequest) -> RestResult<LedgersResult> {
        self.private_post(private::LEDGERS, &request.to_params()).await
    }

    #[instrument(skip(self), fields(count = pairs.len()))]
    async fn trade_volume(&self, pairs: &[&str]) -> RestResult<TradeVolume> {
        let mut params = FormParams::new();
        params.push_list("pair", pairs);
        self.private_post(private::TRADE_VOLUME, &params).await
    }

    #[instrument(skip(self))]
    async fn websockets_token(&self) -> RestResult<WebSocketsToken> {
        self.private_post(private::WEBSOCKETS_TOKEN, &FormParams::new())
            .await
    }

    #[instrument(skip(self))]
    async fn retrieve_export(&self, id: &str) -> RestResult<Vec<u8>> {
        let mut params = FormParams::new();
        params.push("id", id);
        self.private_bytes(private::RETRIEVE_EXPORT, &params).await
    }
}

// Response types specific to account endpoints

/// Extended balance with hold amounts
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedBalance {
    pub balance: String,
    pub credit: Option<String>,
    pub credit_used: Option<String>,
    /// Amount on hold by open orders
    pub hold_trade: Option<String>,
}

/// Trade balance (margin summary)
#[derive(Debug, Clone, Deserialize)]
pub struct TradeBalance {
    /// Equivalent balance (combined balance of all currencies)
    pub eb: String,
    /// Trade balance (combined balance of all equity currencies)
    pub tb: String,
    /// Margin amount of open positions
    pub m: Option<String>,
    /// Unrealized net profit/loss of open positions
    pub n: Option<String>,
    /// Cost basis of open positions
    pub c: Option<String>,
    /// Current floating valuation of open positions
    pub v: Option<String>,
    /// Equity: trade balance + unrealized net profit/loss
    pub e: Option<String>,
    /// Free margin
    pub mf: Option<String>,
    /// Margin level
    pub ml: Option<String>,
    /// Unexecuted value
    pub uv: Option<String>,
}

/// Open orders result
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrdersResult {
    #[serde(default)]
    pub open: HashMap<String, OrderInfo>,
}

/// Closed orders result
#[derive(Debug, Clone, Deserialize)]
pub struct ClosedOrdersResult {
    #[serde(default)]
    pub closed: HashMap<String, OrderInfo>,
    /// Total matching orders (for pagination)
    pub count: u32,
}

/// Trade history result
#[derive(Debug, Clone, Deserialize)]
pub struct TradesHistoryResult {
    #[serde(default)]
    pub trades: HashMap<String, TradeInfo>,
    /// Total matching trades (for pagination)
    pub count: u32,
}

/// Executed trade
#[derive(Debug, Clone, Deserialize)]
pub struct TradeInfo {
    pub ordertxid: String,
    pub postxid: Option<String>,
    pub pair: String,
    pub time: f64,
    /// Type (buy/sell)
    #[serde(rename = "type")]
    pub side: String,
    pub ordertype: String,
    pub price: String,
    pub cost: String,
    pub fee: String,
    pub vol: String,
    pub margin: Option<String>,
    #[serde(default)]
    pub misc: String,
    pub maker: Option<bool>,
    /// Related trades when requested with `trades=true`
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub trades: Vec<String>,
}

/// Ledgers result
#[derive(Debug, Clone, Deserialize)]
pub struct LedgersResult {
    #[serde(default)]
    pub ledger: HashMap<String, LedgerEntry>,
    /// Absent when requested with `without_count`
    pub count: Option<u32>,
}

/// Ledger entry
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerEntry {
    pub refid: String,
    pub time: f64,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub subtype: Option<String>,
    pub aclass: String,
    pub asset: String,
    pub amount: String,
    pub fee: String,
    /// Resulting balance
    pub balance: String,
}

/// Trade volume and fee tiers
#[derive(Debug, Clone, Deserialize)]
pub struct TradeVolume {
    /// Fee volume currency
    pub currency: String,
    /// 30-day volume
    pub volume: String,
    #[serde(default)]
    pub fees: HashMap<String, FeeTier>,
    #[serde(default)]
    pub fees_maker: HashMap<String, FeeTier>,
}

/// Fee tier for one pair
#[derive(Debug, Clone, Deserialize)]
pub struct FeeTier {
    /// Current fee in percent
    pub fee: String,
    pub minfee: Option<String>,
    pub maxfee: Option<String>,
    pub nextfee: Option<String>,
    pub nextvolume: Option<String>,
    pub tiervolume: Option<String>,
}

/// WebSocket authentication token
#[derive(Clone, Deserialize)]
pub struct WebSocketsToken {
    pub token: String,
    /// Seconds until the token expires if no connection uses it
    pub expires: u64,
}

impl std::fmt::Debug for WebSocketsToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketsToken")
            .field("token", &"[REDACTED]")
            .field("expires", &self.expires)
            .finish()
    }
}
