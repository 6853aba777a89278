//! Types shared across endpoint groups: order builders, query builders and
//! the order/ticker/book shapes several endpoints return

use kraken_types::tolerant::string_list;
use kraken_types::{
    CloseTime, LedgerType, OrderFlag, OrderSide, OrderStatus, OrderType, TimeInForce,
    TriggerPrice,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::request::FormParams;

// ============================================================================
// Market Data Types
// ============================================================================

/// Ticker information for a trading pair
#[derive(Debug, Clone, Deserialize)]
pub struct TickerInfo {
    /// Ask [price, whole lot volume, lot volume]
    pub a: Vec<String>,
    /// Bid [price, whole lot volume, lot volume]
    pub b: Vec<String>,
    /// Last trade closed [price, lot volume]
    pub c: Vec<String>,
    /// Volume [today, last 24 hours]
    pub v: Vec<String>,
    /// Volume weighted average price [today, last 24 hours]
    pub p: Vec<String>,
    /// Number of trades [today, last 24 hours]
    pub t: Vec<u64>,
    /// Low [today, last 24 hours]
    pub l: Vec<String>,
    /// High [today, last 24 hours]
    pub h: Vec<String>,
    /// Today's opening price
    pub o: String,
}

impl TickerInfo {
    /// Get the current ask price
    pub fn ask_price(&self) -> Option<Decimal> {
        self.a.first().and_then(|s| s.parse().ok())
    }

    /// Get the current bid price
    pub fn bid_price(&self) -> Option<Decimal> {
        self.b.first().and_then(|s| s.parse().ok())
    }

    /// Get the last trade price
    pub fn last_price(&self) -> Option<Decimal> {
        self.c.first().and_then(|s| s.parse().ok())
    }

    /// Get the mid price (average of bid and ask)
    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.ask_price()? + self.bid_price()?) / Decimal::TWO)
    }

    /// Get spread in basis points
    pub fn spread_bps(&self) -> Option<Decimal> {
        let ask = self.ask_price()?;
        let bid = self.bid_price()?;
        let mid = self.mid_price()?;
        if mid.is_zero() {
            return None;
        }
        Some((ask - bid) / mid * Decimal::from(10000))
    }
}

/// One order book level: `[price, volume, timestamp]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookLevel(pub String, pub String, pub u64);

impl BookLevel {
    pub fn price(&self) -> Option<Decimal> {
        self.0.parse().ok()
    }

    pub fn volume(&self) -> Option<Decimal> {
        self.1.parse().ok()
    }

    pub fn timestamp(&self) -> u64 {
        self.2
    }
}

/// Orderbook snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct OrderbookData {
    pub asks: Vec<BookLevel>,
    pub bids: Vec<BookLevel>,
}

impl OrderbookData {
    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first()?.price()
    }

    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first()?.price()
    }

    /// Get the spread
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

// ============================================================================
// Account Types
// ============================================================================

/// Account balance information
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalanceInfo(pub HashMap<String, String>);

impl BalanceInfo {
    /// Get balance for a specific asset
    pub fn get(&self, asset: &str) -> Option<Decimal> {
        self.0.get(asset).and_then(|s| s.parse().ok())
    }

    /// Get all non-zero balances
    pub fn non_zero(&self) -> HashMap<String, Decimal> {
        self.iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(asset, balance)| (asset.clone(), balance))
            .collect()
    }

    /// Iterate over all balances
    pub fn iter(&self) -> impl Iterator<Item = (&String, Decimal)> {
        self.0.iter().filter_map(|(k, v)| {
            let balance: Decimal = v.parse().ok()?;
            Some((k, balance))
        })
    }
}

/// Order as reported by the open / closed / query order endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    /// Referral order transaction ID that created this order
    pub refid: Option<String>,
    pub userref: Option<i64>,
    /// Client order id
    pub cl_ord_id: Option<String>,
    pub status: OrderStatus,
    pub opentm: f64,
    #[serde(default)]
    pub starttm: f64,
    #[serde(default)]
    pub expiretm: f64,
    /// Close timestamp (closed orders only)
    pub closetm: Option<f64>,
    pub descr: OrderDescription,
    pub vol: String,
    pub vol_exec: String,
    pub cost: String,
    pub fee: String,
    /// Average fill price
    pub price: String,
    pub stopprice: Option<String>,
    pub limitprice: Option<String>,
    #[serde(default)]
    pub misc: String,
    #[serde(default)]
    pub oflags: String,
    /// Trade ids (only when requested with `trades=true`)
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub trades: Vec<String>,
    /// Cancel / expiry reason
    pub reason: Option<String>,
}

impl OrderInfo {
    /// Volume still open
    pub fn remaining(&self) -> Option<Decimal> {
        let vol: Decimal = self.vol.parse().ok()?;
        let exec: Decimal = self.vol_exec.parse().ok()?;
        Some(vol - exec)
    }
}

/// Order description
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderDescription {
    pub pair: String,
    /// Type (buy/sell)
    #[serde(rename = "type")]
    pub side: String,
    pub ordertype: String,
    /// Primary price
    pub price: String,
    /// Secondary price
    pub price2: String,
    pub leverage: String,
    /// Human readable order description
    pub order: String,
    /// Close order description
    pub close: String,
}

// ============================================================================
// Order Builders
// ============================================================================

/// Request to place an order
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Trading pair
    pub pair: String,
    /// Order side
    pub side: OrderSide,
    /// Order type
    pub order_type: OrderType,
    /// Order volume
    pub volume: Decimal,
    /// Price (limit price, or trigger price for stop / take-profit)
    pub price: Option<Decimal>,
    /// Secondary price (limit price of stop-loss-limit, take-profit-limit)
    pub price2: Option<Decimal>,
    /// Price signal that triggers stop / take-profit orders
    pub trigger: Option<TriggerPrice>,
    /// Time in force
    pub time_in_force: Option<TimeInForce>,
    /// Leverage (for margin)
    pub leverage: Option<String>,
    /// Only reduce an existing margin position
    pub reduce_only: bool,
    /// Order flags
    pub flags: Vec<OrderFlag>,
    /// Start time
    pub starttm: Option<String>,
    /// Expire time
    pub expiretm: Option<String>,
    /// User reference ID
    pub userref: Option<i32>,
    /// Client order ID
    pub cl_ord_id: Option<String>,
    /// Validate only (don't submit)
    pub validate: bool,
    /// Close order type
    pub close_order_type: Option<OrderType>,
    /// Close order price
    pub close_price: Option<Decimal>,
    /// Close order price2
    pub close_price2: Option<Decimal>,
    /// RFC3339 deadline after which the matching engine rejects the order
    pub deadline: Option<String>,
}

impl OrderRequest {
    /// Order of any type with no prices set
    pub fn new(
        pair: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        volume: Decimal,
    ) -> Self {
        Self {
            pair: pair.into(),
            side,
            order_type,
            volume,
            price: None,
            price2: None,
            trigger: None,
            time_in_force: None,
            leverage: None,
            reduce_only: false,
            flags: Vec::new(),
            starttm: None,
            expiretm: None,
            userref: None,
            cl_ord_id: None,
            validate: false,
            close_order_type: None,
            close_price: None,
            close_price2: None,
            deadline: None,
        }
    }

    /// Create a market order
    pub fn market(pair: impl Into<String>, side: OrderSide, volume: Decimal) -> Self {
        Self::new(pair, side, OrderType::Market, volume)
    }

    /// Create a limit order
    pub fn limit(pair: impl Into<String>, side: OrderSide, volume: Decimal, price: Decimal) -> Self {
        let mut order = Self::new(pair, side, OrderType::Limit, volume);
        order.price = Some(price);
        order
    }

    /// Create a stop loss order
    pub fn stop_loss(
        pair: impl Into<String>,
        side: OrderSide,
        volume: Decimal,
        stop_price: Decimal,
    ) -> Self {
        let mut order = Self::new(pair, side, OrderType::StopLoss, volume);
        order.price = Some(stop_price);
        order
    }

    /// Create a take profit order
    pub fn take_profit(
        pair: impl Into<String>,
        side: OrderSide,
        volume: Decimal,
        trigger_price: Decimal,
    ) -> Self {
        let mut order = Self::new(pair, side, OrderType::TakeProfit, volume);
        order.price = Some(trigger_price);
        order
    }

    /// Create a stop loss limit order
    pub fn stop_loss_limit(
        pair: impl Into<String>,
        side: OrderSide,
        volume: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> Self {
        let mut order = Self::new(pair, side, OrderType::StopLossLimit, volume);
        order.price = Some(stop_price);
        order.price2 = Some(limit_price);
        order
    }

    /// Set time in force
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    /// Add an order flag
    pub fn with_flag(mut self, flag: OrderFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    /// Set as post-only (maker only)
    pub fn post_only(self) -> Self {
        self.with_flag(OrderFlag::PostOnly)
    }

    /// Set the trigger price signal
    pub fn with_trigger(mut self, trigger: TriggerPrice) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set leverage for margin trading
    pub fn with_leverage(mut self, leverage: impl Into<String>) -> Self {
        self.leverage = Some(leverage.into());
        self
    }

    /// Only reduce an existing position
    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }

    /// Set user reference ID
    pub fn with_userref(mut self, userref: i32) -> Self {
        self.userref = Some(userref);
        self
    }

    /// Set client order ID
    pub fn with_client_id(mut self, cl_ord_id: impl Into<String>) -> Self {
        self.cl_ord_id = Some(cl_ord_id.into());
        self
    }

    /// Scheduled start time (`+<n>` for relative seconds, or unix timestamp)
    pub fn start_at(mut self, starttm: impl Into<String>) -> Self {
        self.starttm = Some(starttm.into());
        self
    }

    /// Expiration time (`+<n>` for relative seconds, or unix timestamp)
    pub fn expire_at(mut self, expiretm: impl Into<String>) -> Self {
        self.expiretm = Some(expiretm.into());
        self
    }

    /// Matching engine deadline (RFC3339)
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Set as validate-only (don't actually submit)
    pub fn validate_only(mut self) -> Self {
        self.validate = true;
        self
    }

    /// Add a close order
    pub fn with_close(mut self, order_type: OrderType, price: Decimal) -> Self {
        self.close_order_type = Some(order_type);
        self.close_price = Some(price);
        self
    }

    /// Per-order fields, shared by `AddOrder` and each `AddOrderBatch` entry
    ///
    /// Excludes `pair`, `validate` and `deadline`, which belong to the request
    /// rather than the order in a batch.
    pub(crate) fn order_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("type", self.side.to_string()),
            ("ordertype", self.order_type.to_string()),
            ("volume", self.volume.to_string()),
        ];

        if let Some(price) = &self.price {
            fields.push(("price", price.to_string()));
        }
        if let Some(price2) = &self.price2 {
            fields.push(("price2", price2.to_string()));
        }
        if let Some(trigger) = &self.trigger {
            fields.push(("trigger", trigger.to_string()));
        }
        if let Some(tif) = &self.time_in_force {
            fields.push(("timeinforce", tif.to_string()));
        }
        if let Some(leverage) = &self.leverage {
            fields.push(("leverage", leverage.clone()));
        }
        if self.reduce_only {
            fields.push(("reduce_only", "true".to_string()));
        }
        if !self.flags.is_empty() {
            fields.push(("oflags", OrderFlag::join(&self.flags)));
        }
        if let Some(starttm) = &self.starttm {
            fields.push(("starttm", starttm.clone()));
        }
        if let Some(expiretm) = &self.expiretm {
            fields.push(("expiretm", expiretm.clone()));
        }
        if let Some(userref) = self.userref {
            fields.push(("userref", userref.to_string()));
        }
        if let Some(cl_ord_id) = &self.cl_ord_id {
            fields.push(("cl_ord_id", cl_ord_id.clone()));
        }
        if let Some(close_type) = &self.close_order_type {
            fields.push(("close[ordertype]", close_type.to_string()));
        }
        if let Some(close_price) = &self.close_price {
            fields.push(("close[price]", close_price.to_string()));
        }
        if let Some(close_price2) = &self.close_price2 {
            fields.push(("close[price2]", close_price2.to_string()));
        }

        fields
    }

    /// Form parameters for a single `AddOrder`
    pub fn to_params(&self) -> FormParams {
        let mut params = FormParams::new();
        params.push("pair", &self.pair);
        for (key, value) in self.order_fields() {
            params.push(key, value);
        }
        params
            .push_opt("deadline", self.deadline.as_ref())
            .push_flag("validate", self.validate);
        params
    }
}

/// Request to amend an open order
#[derive(Debug, Clone)]
pub struct EditOrderRequest {
    /// Transaction ID or user reference of the order to edit
    pub txid: String,
    pub pair: String,
    pub volume: Option<Decimal>,
    pub price: Option<Decimal>,
    pub price2: Option<Decimal>,
    pub userref: Option<i32>,
    pub flags: Vec<OrderFlag>,
    pub deadline: Option<String>,
    /// Wait for the old order to be cancelled before replying
    pub cancel_response: bool,
    pub validate: bool,
}

impl EditOrderRequest {
    pub fn new(txid: impl Into<String>, pair: impl Into<String>) -> Self {
        Self {
            txid: txid.into(),
            pair: pair.into(),
            volume: None,
            price: None,
            price2: None,
            userref: None,
            flags: Vec::new(),
            deadline: None,
            cancel_response: false,
            validate: false,
        }
    }

    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_price2(mut self, price2: Decimal) -> Self {
        self.price2 = Some(price2);
        self
    }

    pub fn with_userref(mut self, userref: i32) -> Self {
        self.userref = Some(userref);
        self
    }

    pub fn with_flag(mut self, flag: OrderFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    pub fn wait_for_cancel(mut self) -> Self {
        self.cancel_response = true;
        self
    }

    pub fn validate_only(mut self) -> Self {
        self.validate = true;
        self
    }

    pub fn to_params(&self) -> FormParams {
        let mut params = FormParams::new();
        params
            .push("txid", &self.txid)
            .push("pair", &self.pair)
            .push_opt("volume", self.volume)
            .push_opt("price", self.price)
            .push_opt("price2", self.price2)
            .push_opt("userref", self.userref);
        if !self.flags.is_empty() {
            params.push("oflags", OrderFlag::join(&self.flags));
        }
        params
            .push_opt("deadline", self.deadline.as_ref())
            .push_flag("cancel_response", self.cancel_response)
            .push_flag("validate", self.validate);
        params
    }
}

// ============================================================================
// Query Builders
// ============================================================================

/// Filters for `ClosedOrders`
#[derive(Debug, Clone, Default)]
pub struct ClosedOrdersRequest {
    /// Include trade ids
    pub trades: bool,
    pub userref: Option<i32>,
    pub cl_ord_id: Option<String>,
    /// Start timestamp or order txid (exclusive)
    pub start: Option<String>,
    /// End timestamp or order txid (inclusive)
    pub end: Option<String>,
    /// Result offset for pagination
    pub ofs: Option<u32>,
    pub closetime: CloseTime,
}

impl ClosedOrdersRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(mut self) -> Self {
        self.trades = true;
        self
    }

    pub fn with_userref(mut self, userref: i32) -> Self {
        self.userref = Some(userref);
        self
    }

    pub fn with_client_id(mut self, cl_ord_id: impl Into<String>) -> Self {
        self.cl_ord_id = Some(cl_ord_id.into());
        self
    }

    pub fn between(mut self, start: impl ToString, end: impl ToString) -> Self {
        self.start = Some(start.to_string());
        self.end = Some(end.to_string());
        self
    }

    pub fn with_offset(mut self, ofs: u32) -> Self {
        self.ofs = Some(ofs);
        self
    }

    pub fn with_closetime(mut self, closetime: CloseTime) -> Self {
        self.closetime = closetime;
        self
    }

    pub fn to_params(&self) -> FormParams {
        let mut params = FormParams::new();
        params
            .push_flag("trades", self.trades)
            .push_opt("userref", self.userref)
            .push_opt("cl_ord_id", self.cl_ord_id.as_ref())
            .push_opt("start", self.start.as_ref())
            .push_opt("end", self.end.as_ref())
            .push_opt("ofs", self.ofs);
        if self.closetime != CloseTime::Both {
            params.push("closetime", self.closetime);
        }
        params
    }
}

/// Filters for `TradesHistory`
#[derive(Debug, Clone, Default)]
pub struct TradesHistoryRequest {
    /// Trade type filter (`all`, `any position`, `closed position`, ...)
    pub trade_type: Option<String>,
    /// Include trades related to position
    pub trades: bool,
    pub start: Option<String>,
    pub end: Option<String>,
    pub ofs: Option<u32>,
    /// Consolidate trades by individual taker trades
    pub consolidate_taker: Option<bool>,
}

impl TradesHistoryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, trade_type: impl Into<String>) -> Self {
        self.trade_type = Some(trade_type.into());
        self
    }

    pub fn with_trades(mut self) -> Self {
        self.trades = true;
        self
    }

    pub fn between(mut self, start: impl ToString, end: impl ToString) -> Self {
        self.start = Some(start.to_string());
        self.end = Some(end.to_string());
        self
    }

    pub fn with_offset(mut self, ofs: u32) -> Self {
        self.ofs = Some(ofs);
        self
    }

    pub fn consolidate_taker(mut self, consolidate: bool) -> Self {
        self.consolidate_taker = Some(consolidate);
        self
    }

    pub fn to_params(&self) -> FormParams {
        let mut params = FormParams::new();
        params
            .push_opt("type", self.trade_type.as_ref())
            .push_flag("trades", self.trades)
            .push_opt("start", self.start.as_ref())
            .push_opt("end", self.end.as_ref())
            .push_opt("ofs", self.ofs)
            .push_opt("consolidate_taker", self.consolidate_taker);
        params
    }
}

/// Filters for `Ledgers`
#[derive(Debug, Clone, Default)]
pub struct LedgersRequest {
    /// Assets to restrict output to (all when empty)
    pub assets: Vec<String>,
    /// Asset class
    pub aclass: Option<String>,
    pub ledger_type: LedgerType,
    pub start: Option<String>,
    pub end: Option<String>,
    pub ofs: Option<u32>,
    /// Omit the `count` field, which is slow to compute
    pub without_count: bool,
}

impl LedgersRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_asset(mut self, asset: impl Into<String>) -> Self {
        self.assets.push(asset.into());
        self
    }

    pub fn with_type(mut self, ledger_type: LedgerType) -> Self {
        self.ledger_type = ledger_type;
        self
    }

    pub fn between(mut self, start: impl ToString, end: impl ToString) -> Self {
        self.start = Some(start.to_string());
        self.end = Some(end.to_string());
        self
    }

    pub fn with_offset(mut self, ofs: u32) -> Self {
        self.ofs = Some(ofs);
        self
    }

    pub fn without_count(mut self) -> Self {
        self.without_count = true;
        self
    }

    pub fn to_params(&self) -> FormParams {
        let mut params = FormParams::new();
        params
            .push_list("asset", &self.assets)
            .push_opt("aclass", self.aclass.as_ref());
        if self.ledger_type != LedgerType::All {
            params.push("type", self.ledger_type);
        }
        params
            .push_opt("start", self.start.as_ref())
            .push_opt("end", self.end.as_ref())
            .push_opt("ofs", self.ofs)
            .push_flag("without_count", self.without_count);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_builder() {
        let order = OrderRequest::limit("XBTUSD", OrderSide::Buy, Decimal::ONE, Decimal::from(50000))
            .post_only()
            .post_only()
            .with_userref(123)
            .with_time_in_force(TimeInForce::GoodTillCancelled);

        assert_eq!(order.pair, "XBTUSD");
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.price, Some(Decimal::from(50000)));
        assert_eq!(order.flags, vec![OrderFlag::PostOnly]);
        assert_eq!(order.userref, Some(123));
    }

    #[test]
    fn test_order_params() {
        let params = OrderRequest::limit("XBTUSD", OrderSide::Buy, Decimal::new(125, 2), Decimal::from(37500))
            .with_close(OrderType::StopLoss, Decimal::from(30000))
            .validate_only()
            .to_params();

        assert_eq!(params.get("pair"), Some("XBTUSD"));
        assert_eq!(params.get("type"), Some("buy"));
        assert_eq!(params.get("ordertype"), Some("limit"));
        assert_eq!(params.get("volume"), Some("1.25"));
        assert_eq!(params.get("price"), Some("37500"));
        assert_eq!(params.get("close[ordertype]"), Some("stop-loss"));
        assert_eq!(params.get("close[price]"), Some("30000"));
        assert_eq!(params.get("validate"), Some("true"));
        assert_eq!(params.get("oflags"), None);
    }

    #[test]
    fn test_stop_loss_limit_prices() {
        let order = OrderRequest::stop_loss_limit(
            "ETHUSD",
            OrderSide::Sell,
            Decimal::ONE,
            Decimal::from(1900),
            Decimal::from(1890),
        )
        .with_trigger(TriggerPrice::Index)
        .reduce_only();
        let params = order.to_params();

        assert_eq!(params.get("price"), Some("1900"));
        assert_eq!(params.get("price2"), Some("1890"));
        assert_eq!(params.get("trigger"), Some("index"));
        assert_eq!(params.get("reduce_only"), Some("true"));
    }

    #[test]
    fn test_edit_order_params() {
        let params = EditOrderRequest::new("OABCDE-12345-FGHIJK", "XBTUSD")
            .with_price(Decimal::from(41000))
            .with_flag(OrderFlag::PostOnly)
            .to_params();

        assert_eq!(params.get("txid"), Some("OABCDE-12345-FGHIJK"));
        assert_eq!(params.get("price"), Some("41000"));
        assert_eq!(params.get("oflags"), Some("post"));
        assert_eq!(params.get("volume"), None);
        assert_eq!(params.get("validate"), None);
    }

    #[test]
    fn test_query_builders_skip_defaults() {
        assert!(ClosedOrdersRequest::new().to_params().is_empty());
        assert!(TradesHistoryRequest::new().to_params().is_empty());
        assert!(LedgersRequest::new().to_params().is_empty());

        let params = ClosedOrdersRequest::new()
            .with_trades()
            .between(1_700_000_000, 1_700_086_400)
            .with_closetime(CloseTime::Close)
            .to_params();
        assert_eq!(params.get("trades"), Some("true"));
        assert_eq!(params.get("start"), Some("1700000000"));
        assert_eq!(params.get("closetime"), Some("close"));

        let params = LedgersRequest::new()
            .for_asset("XXBT")
            .for_asset("ZUSD")
            .with_type(LedgerType::Trade)
            .to_params();
        assert_eq!(params.get("asset"), Some("XXBT,ZUSD"));
        assert_eq!(params.get("type"), Some("trade"));
    }

    #[test]
    fn test_ticker_info_accessors() {
        let ticker: TickerInfo = serde_json::from_value(serde_json::json!({
            "a": ["50000.00", "1", "1.000"],
            "b": ["49999.00", "1", "1.000"],
            "c": ["50000.00", "0.1"],
            "v": ["100.0", "1000.0"],
            "p": ["50000.0", "49500.0"],
            "t": [100, 1000],
            "l": ["49000.0", "48000.0"],
            "h": ["51000.0", "52000.0"],
            "o": "50000.0"
        }))
        .unwrap();

        assert_eq!(ticker.ask_price(), Some(Decimal::from(50000)));
        assert_eq!(ticker.bid_price(), Some(Decimal::from(49999)));
        assert!(ticker.spread_bps().is_some());
    }

    #[test]
    fn test_orderbook_levels() {
        let book: OrderbookData = serde_json::from_str(
            r#"{"asks":[["30243.40000","0.105",1688667796]],"bids":[["30243.30000","0.042",1688667796]]}"#,
        )
        .unwrap();
        assert_eq!(book.best_ask(), Some(Decimal::new(302434, 1)));
        assert_eq!(book.spread(), Some(Decimal::new(1, 1)));
        assert_eq!(book.asks[0].timestamp(), 1688667796);
    }

    #[test]
    fn test_balance_non_zero() {
        let balance: BalanceInfo =
            serde_json::from_str(r#"{"ZUSD":"171288.6158","XXBT":"0.0000000000","XETH":"1.5"}"#)
                .unwrap();
        let non_zero = balance.non_zero();
        assert_eq!(non_zero.len(), 2);
        assert_eq!(balance.get("XETH"), Some(Decimal::new(15, 1)));
    }

    #[test]
    fn test_order_info_decoding() {
        let order: OrderInfo = serde_json::from_value(serde_json::json!({
            "refid": null,
            "userref": 0,
            "status": "open",
            "opentm": 1688666559.8974,
            "starttm": 0,
            "expiretm": 0,
            "descr": {
                "pair": "XBTUSD",
                "type": "buy",
                "ordertype": "limit",
                "price": "30010.0",
                "price2": "0",
                "leverage": "none",
                "order": "buy 1.25000000 XBTUSD @ limit 30010.0",
                "close": ""
            },
            "vol": "1.25000000",
            "vol_exec": "0.37500000",
            "cost": "11253.7",
            "fee": "0.00000",
            "price": "30010.0",
            "stopprice": "0.00000",
            "limitprice": "0.00000",
            "misc": "",
            "oflags": "fciq",
            "trades": "TCCCTY-WE2O6-P3NB37"
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.descr.side, "buy");
        assert_eq!(order.trades, vec!["TCCCTY-WE2O6-P3NB37"]);
        assert_eq!(order.remaining(), Some(Decimal::new(875, 3)));
    }
}
