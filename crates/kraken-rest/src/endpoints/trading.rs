//! Private trading endpoints
//!
//! These endpoints require authentication and can place real orders.

use async_trait::async_trait;
use kraken_types::tolerant::string_list;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::client::KrakenRestClient;
use crate::constants::{private, MAX_BATCH_ORDERS, MAX_CANCEL_BATCH};
use crate::envelope::{decode_value, Envelope};
use crate::error::{ApiFailure, RestError, RestResult};
use crate::request::FormParams;
use crate::types::{EditOrderRequest, OrderDescription, OrderRequest};

/// Private trading endpoints
#[async_trait]
pub trait Trading: Send + Sync {
    /// Place a new order
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kraken_rest::{KrakenRestClient, OrderRequest, Trading};
    /// use kraken_types::OrderSide;
    /// use rust_decimal::Decimal;
    ///
    /// # async fn example(client: KrakenRestClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let order = OrderRequest::limit("XBTUSD", OrderSide::Buy, Decimal::new(1, 3), Decimal::new(50000, 0))
    ///     .post_only();
    /// let result = client.add_order(&order).await?;
    /// println!("Order placed: {:?}", result.txid);
    /// # Ok(())
    /// # }
    /// ```
    async fn add_order(&self, order: &OrderRequest) -> RestResult<AddOrderResult>;

    /// Place up to 15 orders on one pair in a single request
    ///
    /// Succeeds when at least one entry was accepted; rejected entries carry
    /// their own errors and the envelope errors are kept on the result.
    async fn add_order_batch(
        &self,
        orders: &[OrderRequest],
        validate: bool,
    ) -> RestResult<BatchOrderResult>;

    /// Amend volume, price or flags of an open order
    async fn edit_order(&self, request: &EditOrderRequest) -> RestResult<EditOrderResult>;

    /// Cancel an order by transaction ID, user reference or client order ID
    async fn cancel_order(&self, txid: &str) -> RestResult<CancelOrderResult>;

    /// Cancel all open orders
    async fn cancel_all_orders(&self) -> RestResult<CancelOrderResult>;

    /// Dead man's switch: cancel everything after `timeout_secs` unless re-armed
    ///
    /// A timeout of 0 disarms the timer.
    async fn cancel_all_orders_after(&self, timeout_secs: u32)
        -> RestResult<CancelAllAfterResult>;

    /// Cancel up to 50 orders in a single request
    async fn cancel_order_batch(&self, txids: &[&str]) -> RestResult<BatchCancelResult>;
}

#[async_trait]
impl Trading for KrakenRestClient {
    #[instrument(skip(self, order), fields(pair = %order.pair, side = %order.side))]
    async fn add_order(&self, order: &OrderRequest) -> RestResult<AddOrderResult> {
        self.private_post(private::ADD_ORDER, &order.to_params()).await
    }

    #[instrument(skip(self, orders), fields(count = orders.len()))]
    async fn add_order_batch(
        &self,
        orders: &[OrderRequest],
        validate: bool,
    ) -> RestResult<BatchOrderResult> {
        let params = batch_order_params(orders, validate)?;
        let envelope = self.private_envelope(private::ADD_ORDER_BATCH, &params).await?;
        BatchOrderResult::from_envelope(private::ADD_ORDER_BATCH, envelope)
    }

    #[instrument(skip(self, request), fields(txid = %request.txid))]
    async fn edit_order(&self, request: &EditOrderRequest) -> RestResult<EditOrderResult> {
        self.private_post(private::EDIT_ORDER, &request.to_params())
            .await
    }

    #[instrument(skip(self))]
    async fn cancel_order(&self, txid: &str) -> RestResult<CancelOrderResult> {
        let mut params = FormParams::new();
        params.push("txid", txid);
        self.private_post(private::CANCEL_ORDER, &params).await
    }

    #[instrument(skip(self))]
    async fn cancel_all_orders(&self) -> RestResult<CancelOrderResult> {
        self.private_post(private::CANCEL_ALL, &FormParams::new())
            .await
    }

    #[instrument(skip(self))]
    async fn cancel_all_orders_after(
        &self,
        timeout_secs: u32,
    ) -> RestResult<CancelAllAfterResult> {
        let mut params = FormParams::new();
        params.push("timeout", timeout_secs);
        self.private_post(private::CANCEL_ALL_AFTER, &params).await
    }

    #[instrument(skip(self, txids), fields(count = txids.len()))]
    async fn cancel_order_batch(&self, txids: &[&str]) -> RestResult<BatchCancelResult> {
        let params = cancel_batch_params(txids)?;
        self.private_post(private::CANCEL_ORDER_BATCH, &params)
            .await
    }
}

/// Form body for `AddOrderBatch`: shared `pair`, then `orders[i][field]`
fn batch_order_params(orders: &[OrderRequest], validate: bool) -> RestResult<FormParams> {
    let first = orders
        .first()
        .ok_or_else(|| RestError::Validation("Empty order batch".to_string()))?;

    if orders.len() > MAX_BATCH_ORDERS {
        return Err(RestError::Validation(format!(
            "Batch of {} orders exceeds the maximum of {}",
            orders.len(),
            MAX_BATCH_ORDERS
        )));
    }
    if let Some(other) = orders.iter().find(|o| o.pair != first.pair) {
        return Err(RestError::Validation(format!(
            "Batch orders must share one pair, got {} and {}",
            first.pair, other.pair
        )));
    }

    let mut params = FormParams::new();
    params.push("pair", &first.pair);
    for (i, order) in orders.iter().enumerate() {
        for (field, value) in order.order_fields() {
            params.push(format!("orders[{}][{}]", i, field), value);
        }
    }
    params
        .push_opt("deadline", first.deadline.as_ref())
        .push_flag("validate", validate);

    Ok(params)
}

/// Form body for `CancelOrderBatch`: `orders[i]=txid`
fn cancel_batch_params(txids: &[&str]) -> RestResult<FormParams> {
    if txids.is_empty() {
        return Err(RestError::Validation("Empty cancel batch".to_string()));
    }
    if txids.len() > MAX_CANCEL_BATCH {
        return Err(RestError::Validation(format!(
            "Batch of {} cancels exceeds the maximum of {}",
            txids.len(),
            MAX_CANCEL_BATCH
        )));
    }

    Ok(txids
        .iter()
        .enumerate()
        .map(|(i, txid)| (format!("orders[{}]", i), txid))
        .collect())
}

// Response types specific to trading endpoints

/// Add order result
#[derive(Debug, Clone, Deserialize)]
pub struct AddOrderResult {
    /// Order description
    #[serde(default)]
    pub descr: OrderDescription,
    /// Transaction IDs (empty when only validating)
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub txid: Vec<String>,
}

/// Outcome of one entry in an `AddOrderBatch`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchOrderEntry {
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub txid: Vec<String>,
    #[serde(default)]
    pub descr: Option<OrderDescription>,
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub error: Vec<String>,
}

impl BatchOrderEntry {
    /// Entry was accepted by the exchange
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }
}

/// `AddOrderBatch` result: one entry per submitted order, in order
#[derive(Debug, Clone, Default)]
pub struct BatchOrderResult {
    pub orders: Vec<BatchOrderEntry>,
    /// Envelope-level errors sent next to a partial success
    pub errors: Vec<String>,
}

#[derive(Deserialize)]
struct BatchOrdersPayload {
    #[serde(default)]
    orders: Vec<BatchOrderEntry>,
}

impl BatchOrderResult {
    /// Classify a batch envelope
    ///
    /// The call succeeds when any entry succeeded; otherwise envelope errors
    /// fail it with the raw result attached.
    pub fn from_envelope(context: &str, envelope: Envelope) -> RestResult<Self> {
        let Envelope { error, result } = envelope;

        let orders = match result.as_ref() {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(value) => match decode_value::<BatchOrdersPayload>(context, value.clone()) {
                Ok(payload) => payload.orders,
                Err(_) if !error.is_empty() => Vec::new(),
                Err(e) => return Err(e),
            },
        };

        if !error.is_empty() {
            if !orders.iter().any(BatchOrderEntry::is_success) {
                warn!(endpoint = context, errors = ?error, "Batch rejected");
                return Err(RestError::Api(ApiFailure::new(error, result)));
            }
            warn!(endpoint = context, errors = ?error, "Batch partially accepted");
        }

        Ok(Self {
            orders,
            errors: error,
        })
    }

    /// Transaction IDs of every accepted order
    pub fn txids(&self) -> Vec<&str> {
        self.orders
            .iter()
            .flat_map(|entry| entry.txid.iter().map(String::as_str))
            .collect()
    }

    /// Indices of entries that were rejected
    pub fn failed_indices(&self) -> Vec<usize> {
        self.orders
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_success())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Edit order result
#[derive(Debug, Clone, Deserialize)]
pub struct EditOrderResult {
    #[serde(default)]
    pub descr: OrderDescription,
    /// New transaction ID
    pub txid: Option<String>,
    /// Original transaction ID
    pub originaltxid: Option<String>,
    pub newuserref: Option<i64>,
    pub olduserref: Option<i64>,
    pub orders_cancelled: Option<u32>,
    /// `ok` or `err`
    #[serde(default)]
    pub status: String,
    pub volume: Option<String>,
    pub price: Option<String>,
    pub price2: Option<String>,
    pub error_message: Option<String>,
}

/// Cancel order result
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderResult {
    /// Number of orders cancelled
    pub count: u32,
    /// Cancellation still pending
    #[serde(default)]
    pub pending: bool,
}

/// Dead man's switch state
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAllAfterResult {
    /// Server time when the request was handled
    pub current_time: String,
    /// When orders will be cancelled (`0` when disarmed)
    pub trigger_time: String,
}

/// Batch cancel result
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCancelResult {
    /// Number of orders cancelled
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kraken_types::OrderSide;
    use rust_decimal::Decimal;

    fn limit(pair: &str, side: OrderSide) -> OrderRequest {
        OrderRequest::limit(pair, side, Decimal::new(125, 2), Decimal::new(37500, 0))
    }

    fn envelope(json: &str) -> Envelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_batch_params_layout() {
        let orders = [
            limit("XBTUSD", OrderSide::Buy),
            limit("XBTUSD", OrderSide::Sell).with_userref(7),
        ];
        let params = batch_order_params(&orders, true).unwrap();

        assert_eq!(params.get("pair"), Some("XBTUSD"));
        assert_eq!(params.get("orders[0][type]"), Some("buy"));
        assert_eq!(params.get("orders[1][type]"), Some("sell"));
        assert_eq!(params.get("orders[1][userref]"), Some("7"));
        assert_eq!(params.get("orders[0][price]"), Some("37500"));
        assert_eq!(params.get("validate"), Some("true"));
        assert!(params.get("orders[0][pair]").is_none());
    }

    #[test]
    fn test_batch_params_rejects_bad_batches() {
        assert!(matches!(
            batch_order_params(&[], false),
            Err(RestError::Validation(_))
        ));

        let too_many: Vec<_> = (0..=MAX_BATCH_ORDERS)
            .map(|_| limit("XBTUSD", OrderSide::Buy))
            .collect();
        assert!(matches!(
            batch_order_params(&too_many, false),
            Err(RestError::Validation(_))
        ));

        let mixed = [limit("XBTUSD", OrderSide::Buy), limit("ETHUSD", OrderSide::Buy)];
        assert!(matches!(
            batch_order_params(&mixed, false),
            Err(RestError::Validation(_))
        ));
    }

    #[test]
    fn test_cancel_batch_params() {
        let params = cancel_batch_params(&["OA", "OB"]).unwrap();
        assert_eq!(params.get("orders[0]"), Some("OA"));
        assert_eq!(params.get("orders[1]"), Some("OB"));

        assert!(matches!(cancel_batch_params(&[]), Err(RestError::Validation(_))));
        let too_many = vec!["O"; MAX_CANCEL_BATCH + 1];
        assert!(matches!(
            cancel_batch_params(&too_many),
            Err(RestError::Validation(_))
        ));
    }

    #[test]
    fn test_batch_array_errors_stay_out_of_txid() {
        let result = BatchOrderResult::from_envelope(
            "AddOrderBatch",
            envelope(
                r#"{
                    "error": ["EOrder:Insufficient funds"],
                    "result": {"orders": [
                        {"error": "EOrder:Insufficient funds"},
                        {"error": ["EGeneral:Invalid arguments", "EOrder:Invalid price"],
                         "txid": ["OUF4EM-FRGI2-MQMWZD", "OUF4EM-FRGI2-MQMWZE"]},
                        {"txid": "OQCLML-BW3P3-BUCMWZ", "descr": {"order": "buy 1.25 XBTUSD @ limit 37500"}}
                    ]}
                }"#,
            ),
        )
        .unwrap();

        assert_eq!(result.orders[0].error.len(), 1);
        assert!(result.orders[0].txid.is_empty());
        // Deliberate correction: other batch decoders append array-form errors
        // to `txid`. Here they stay in `error` and `txid` holds only order ids.
        assert_eq!(result.orders[1].error.len(), 2);
        assert_eq!(result.orders[1].txid.len(), 2);
        assert!(result.orders[2].is_success());
        assert_eq!(result.errors, vec!["EOrder:Insufficient funds"]);
        assert_eq!(result.failed_indices(), vec![0, 1]);
    }

    #[test]
    fn test_batch_with_no_accepted_entry_fails() {
        let err = BatchOrderResult::from_envelope(
            "AddOrderBatch",
            envelope(
                r#"{"error":["EOrder:Insufficient funds"],
                    "result":{"orders":[{"error":"EOrder:Insufficient funds"}]}}"#,
            ),
        )
        .unwrap_err();

        let failure = err.api_failure().unwrap();
        assert!(failure.partial.is_some());
    }

    #[test]
    fn test_clean_batch() {
        let result = BatchOrderResult::from_envelope(
            "AddOrderBatch",
            envelope(r#"{"error":[],"result":{"orders":[{"txid":"OA"},{"txid":"OB"}]}}"#),
        )
        .unwrap();
        assert_eq!(result.txids(), vec!["OA", "OB"]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_add_order_result_single_txid() {
        let result: AddOrderResult = serde_json::from_str(
            r#"{"descr":{"order":"buy 1.25 XBTUSD @ limit 37500"},"txid":"OUF4EM-FRGI2-MQMWZD"}"#,
        )
        .unwrap();
        assert_eq!(result.txid, vec!["OUF4EM-FRGI2-MQMWZD"]);
        assert_eq!(result.descr.order, "buy 1.25 XBTUSD @ limit 37500");
    }

    #[test]
    fn test_cancel_all_after_result() {
        let result: CancelAllAfterResult = serde_json::from_str(
            r#"{"currentTime":"2023-03-24T17:41:56Z","triggerTime":"2023-03-24T17:42:56Z"}"#,
        )
        .unwrap();
        assert_eq!(result.trigger_time, "2023-03-24T17:42:56Z");
    }
}
