//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use async_trait::async_trait;
use kraken_types::OhlcInterval;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::instrument;

use crate::client::KrakenRestClient;
use crate::constants::public;
use crate::error::RestResult;
use crate::request::FormParams;
use crate::types::{OrderbookData, TickerInfo};

/// Public market data endpoints
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Get server time
    async fn server_time(&self) -> RestResult<ServerTime>;

    /// Get system status
    async fn system_status(&self) -> RestResult<SystemStatus>;

    /// Get asset info (all assets when `assets` is empty)
    async fn assets(&self, assets: &[&str]) -> RestResult<HashMap<String, AssetInfo>>;

    /// Get tradable asset pairs (all pairs when `pairs` is empty)
    async fn asset_pairs(&self, pairs: &[&str]) -> RestResult<HashMap<String, AssetPairInfo>>;

    /// Get ticker information (all pairs when `pairs` is empty)
    async fn ticker(&self, pairs: &[&str]) -> RestResult<HashMap<String, TickerInfo>>;

    /// Get OHLC candles
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    /// * `interval` - Candle width
    /// * `since` - Return candles after this timestamp (optional)
    async fn ohlc(
        &self,
        pair: &str,
        interval: OhlcInterval,
        since: Option<u64>,
    ) -> RestResult<OhlcResult>;

    /// Get orderbook depth
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    /// * `count` - Maximum number of asks/bids (1-500, default 100)
    async fn order_book(
        &self,
        pair: &str,
        count: Option<u16>,
    ) -> RestResult<HashMap<String, OrderbookData>>;

    /// Get recent trades
    ///
    /// `since` is the `last` cursor from a previous call.
    async fn recent_trades(
        &self,
        pair: &str,
        since: Option<&str>,
        count: Option<u16>,
    ) -> RestResult<RecentTradesResult>;

    /// Get recent spread data
    async fn recent_spreads(
        &self,
        pair: &str,
        since: Option<u64>,
    ) -> RestResult<RecentSpreadsResult>;
}

#[async_trait]
impl MarketData for KrakenRestClient {
    #[instrument(skip(self))]
    async fn server_time(&self) -> RestResult<ServerTime> {
        self.public_get(public::TIME, &FormParams::new()).await
    }

    #[instrument(skip(self))]
    async fn system_status(&self) -> RestResult<SystemStatus> {
        self.public_get(public::SYSTEM_STATUS, &FormParams::new()).await
    }

    #[instrument(skip(self), fields(count = assets.len()))]
    async fn assets(&self, assets: &[&str]) -> RestResult<HashMap<String, AssetInfo>> {
        let mut params = FormParams::new();
        params.push_list("asset", assets);
        self.public_get(public::ASSETS, &params).await
    }

    #[instrument(skip(self), fields(count = pairs.len()))]
    async fn asset_pairs(&self, pairs: &[&str]) -> RestResult<HashMap<String, AssetPairInfo>> {
        let mut params = FormParams::new();
        params.push_list("pair", pairs);
        self.public_get(public::ASSET_PAIRS, &params).await
    }

    #[instrument(skip(self), fields(count = pairs.len()))]
    async fn ticker(&self, pairs: &[&str]) -> RestResult<HashMap<String, TickerInfo>> {
        let mut params = FormParams::new();
        params.push_list("pair", pairs);
        self.public_get(public::TICKER, &params).await
    }

    #[instrument(skip(self))]
    async fn ohlc(
        &self,
        pair: &str,
        interval: OhlcInterval,
        since: Option<u64>,
    ) -> RestResult<OhlcResult> {
        let mut params = FormParams::new();
        params
            .push("pair", pair)
            .push("interval", interval.minutes())
            .push_opt("since", since);
        self.public_get(public::OHLC, &params).await
    }

    #[instrument(skip(self))]
    async fn order_book(
        &self,
        pair: &str,
        count: Option<u16>,
    ) -> RestResult<HashMap<String, OrderbookData>> {
        let mut params = FormParams::new();
        params
            .push("pair", pair)
            .push_opt("count", count.map(|c| c.clamp(1, 500)));
        self.public_get(public::DEPTH, &params).await
    }

    #[instrument(skip(self))]
    async fn recent_trades(
        &self,
        pair: &str,
        since: Option<&str>,
        count: Option<u16>,
    ) -> RestResult<RecentTradesResult> {
        let mut params = FormParams::new();
        params
            .push("pair", pair)
            .push_opt("since", since)
            .push_opt("count", count.map(|c| c.clamp(1, 1000)));
        self.public_get(public::TRADES, &params).await
    }

    #[instrument(skip(self))]
    async fn recent_spreads(
        &self,
        pair: &str,
        since: Option<u64>,
    ) -> RestResult<RecentSpreadsResult> {
        let mut params = FormParams::new();
        params.push("pair", pair).push_opt("since", since);
        self.public_get(public::SPREAD, &params).await
    }
}

// Response types specific to market endpoints

/// Server time response
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTime {
    /// Unix timestamp
    pub unixtime: u64,
    /// RFC 1123 time string
    pub rfc1123: String,
}

/// System status response
#[derive(Debug, Clone, Deserialize)]
pub struct SystemStatus {
    /// System status (online, maintenance, cancel_only, post_only)
    pub status: String,
    pub timestamp: String,
}

impl SystemStatus {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

/// Asset information
#[derive(Debug, Clone, Deserialize)]
pub struct AssetInfo {
    pub aclass: String,
    pub altname: String,
    pub decimals: u32,
    pub display_decimals: u32,
    pub collateral_value: Option<f64>,
    pub status: Option<String>,
}

/// Asset pair information
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPairInfo {
    pub altname: String,
    pub wsname: Option<String>,
    pub aclass_base: String,
    pub base: String,
    pub aclass_quote: String,
    pub quote: String,
    pub pair_decimals: u32,
    pub cost_decimals: Option<u32>,
    pub lot_decimals: u32,
    pub lot_multiplier: u32,
    /// Fee schedule `[volume, percent fee]`
    #[serde(default)]
    pub fees: Vec<(f64, f64)>,
    #[serde(default)]
    pub fees_maker: Vec<(f64, f64)>,
    pub ordermin: Option<String>,
    pub costmin: Option<String>,
    pub tick_size: Option<String>,
    pub status: Option<String>,
    pub margin_call: Option<u32>,
    pub margin_stop: Option<u32>,
}

/// OHLC result
#[derive(Debug, Clone, Deserialize)]
pub struct OhlcResult {
    /// Candle rows per pair
    #[serde(flatten)]
    pub ohlc: HashMap<String, Vec<Vec<Value>>>,
    /// Cursor for the next call
    pub last: u64,
}

/// Individual OHLC candle
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcCandle {
    pub time: u64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub vwap: String,
    pub volume: String,
    pub count: u64,
}

impl OhlcCandle {
    /// Parse a `[time, open, high, low, close, vwap, volume, count]` row
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let text = |i: usize| row.get(i)?.as_str().map(str::to_string);
        Some(Self {
            time: row.first()?.as_u64()?,
            open: text(1)?,
            high: text(2)?,
            low: text(3)?,
            close: text(4)?,
            vwap: text(5)?,
            volume: text(6)?,
            count: row.get(7)?.as_u64()?,
        })
    }
}

impl OhlcResult {
    /// Typed candles for `pair`; malformed rows are skipped
    pub fn candles(&self, pair: &str) -> Vec<OhlcCandle> {
        self.ohlc
            .get(pair)
            .map(|rows| rows.iter().filter_map(|r| OhlcCandle::from_row(r)).collect())
            .unwrap_or_default()
    }
}

/// Recent trades result
#[derive(Debug, Clone, Deserialize)]
pub struct RecentTradesResult {
    /// Trade rows per pair `[price, volume, time, side, type, misc, trade_id]`
    #[serde(flatten)]
    pub trades: HashMap<String, Vec<Vec<Value>>>,
    /// Cursor for the next call
    pub last: String,
}

/// Recent spreads result
#[derive(Debug, Clone, Deserialize)]
pub struct RecentSpreadsResult {
    /// Spread rows per pair `[time, bid, ask]`
    #[serde(flatten)]
    pub spreads: HashMap<String, Vec<Vec<Value>>>,
    /// Cursor for the next call
    pub last: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ohlc_candles() {
        let result: OhlcResult = serde_json::from_str(
            r#"{
                "XXBTZUSD": [
                    [1688671200, "30306.1", "30306.2", "30305.7", "30305.7", "30306.1", "3.39243896", 23],
                    ["bad row"]
                ],
                "last": 1688672160
            }"#,
        )
        .unwrap();

        assert_eq!(result.last, 1688672160);
        let candles = result.candles("XXBTZUSD");
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, "30305.7");
        assert_eq!(candles[0].count, 23);
        assert!(result.candles("XETHZUSD").is_empty());
    }

    #[test]
    fn test_recent_trades_cursor_is_text() {
        let result: RecentTradesResult = serde_json::from_str(
            r#"{"XXBTZUSD":[["30243.40000","0.34507674",1688669597.8277369,"b","m","",61044952]],"last":"1688671969993150842"}"#,
        )
        .unwrap();
        assert_eq!(result.last, "1688671969993150842");
        assert_eq!(result.trades["XXBTZUSD"].len(), 1);
    }

    #[test]
    fn test_asset_pair_fee_schedule() {
        let pair: AssetPairInfo = serde_json::from_value(serde_json::json!({
            "altname": "XBTUSD",
            "wsname": "XBT/USD",
            "aclass_base": "currency",
            "base": "XXBT",
            "aclass_quote": "currency",
            "quote": "ZUSD",
            "pair_decimals": 1,
            "cost_decimals": 5,
            "lot_decimals": 8,
            "lot_multiplier": 1,
            "fees": [[0, 0.26], [50000, 0.24]],
            "fees_maker": [[0, 0.16]],
            "ordermin": "0.0001",
            "costmin": "0.5",
            "tick_size": "0.1",
            "status": "online"
        }))
        .unwrap();
        assert_eq!(pair.fees.len(), 2);
        assert_eq!(pair.fees[1], (50000.0, 0.24));
    }
}
