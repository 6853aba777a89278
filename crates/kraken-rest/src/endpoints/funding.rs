//! Funding endpoints for deposits and withdrawals
//!
//! These endpoints require authentication.

use async_trait::async_trait;
use kraken_types::tolerant::{lenient_bool, optional_limit, timestamp_text};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::client::KrakenRestClient;
use crate::constants::private;
use crate::error::RestResult;
use crate::request::FormParams;

/// Funding endpoints for deposits, withdrawals and wallet transfers
#[async_trait]
pub trait Funding: Send + Sync {
    /// Get deposit methods for an asset
    ///
    /// # Arguments
    /// * `asset` - Asset to get deposit methods for (e.g., "XBT", "ETH")
    async fn deposit_methods(&self, asset: &str) -> RestResult<Vec<DepositMethod>>;

    /// Get deposit addresses
    ///
    /// # Arguments
    /// * `asset` - Asset to get addresses for
    /// * `method` - Deposit method name
    /// * `new` - Generate a new address
    async fn deposit_addresses(
        &self,
        asset: &str,
        method: &str,
        new: bool,
    ) -> RestResult<Vec<DepositAddress>>;

    /// Get status of recent deposits
    async fn deposit_status(
        &self,
        asset: Option<&str>,
        method: Option<&str>,
    ) -> RestResult<Vec<TransferStatus>>;

    /// Get withdrawal methods, optionally for one asset
    async fn withdraw_methods(&self, asset: Option<&str>) -> RestResult<Vec<WithdrawMethod>>;

    /// Get saved withdrawal addresses, optionally for one asset
    async fn withdraw_addresses(&self, asset: Option<&str>)
        -> RestResult<Vec<WithdrawAddress>>;

    /// Get fee and limit information for a prospective withdrawal
    ///
    /// # Arguments
    /// * `asset` - Asset to withdraw
    /// * `key` - Withdrawal key name (as configured in account)
    /// * `amount` - Amount to withdraw
    async fn withdraw_info(
        &self,
        asset: &str,
        key: &str,
        amount: Decimal,
    ) -> RestResult<WithdrawInfo>;

    /// Request a withdrawal to a saved withdrawal key
    async fn withdraw(&self, asset: &str, key: &str, amount: Decimal)
        -> RestResult<ReferenceId>;

    /// Get status of recent withdrawals
    async fn withdraw_status(
        &self,
        asset: Option<&str>,
        method: Option<&str>,
    ) -> RestResult<Vec<TransferStatus>>;

    /// Cancel a pending withdrawal; `true` when the cancel was accepted
    async fn withdraw_cancel(&self, asset: &str, refid: &str) -> RestResult<bool>;

    /// Move funds from the spot wallet to the futures wallet
    async fn wallet_transfer(
        &self,
        asset: &str,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> RestResult<ReferenceId>;
}

#[async_trait]
impl Funding for KrakenRestClient {
    #[instrument(skip(self))]
    async fn deposit_methods(&self, asset: &str) -> RestResult<Vec<DepositMethod>> {
        let mut params = FormParams::new();
        params.push("asset", asset);
        self.private_post(private::DEPOSIT_METHODS, &params).await
    }

    #[instrument(skip(self))]
    async fn deposit_addresses(
        &self,
        asset: &str,
        method: &str,
        new: bool,
    ) -> RestResult<Vec<DepositAddress>> {
        let mut params = FormParams::new();
        params
            .push("asset", asset)
            .push("method", method)
            .push_flag("new", new);
        self.private_post(private::DEPOSIT_ADDRESSES, &params).await
    }

    #[instrument(skip(self))]
    async fn deposit_status(
        &self,
        asset: Option<&str>,
        method: Option<&str>,
    ) -> RestResult<Vec<TransferStatus>> {
        let mut params = FormParams::new();
        params.push_opt("asset", asset).push_opt("method", method);
        self.private_post(private::DEPOSIT_STATUS, &params).await
    }

    #[instrument(skip(self))]
    async fn withdraw_methods(&self, asset: Option<&str>) -> RestResult<Vec<WithdrawMethod>> {
        let mut params = FormParams::new();
        params.push_opt("asset", asset);
        self.private_post(private::WITHDRAW_METHODS, &params).await
    }

    #[instrument(skip(self))]
    async fn withdraw_addresses(
        &self,
        asset: Option<&str>,
    ) -> RestResult<Vec<WithdrawAddress>> {
        let mut params = FormParams::new();
        params.push_opt("asset", asset);
        self.private_post(private::WITHDRAW_ADDRESSES, &params).await
    }

    #[instrument(skip(self))]
    async fn withdraw_info(
        &self,
        asset: &str,
        key: &str,
        amount: Decimal,
    ) -> RestResult<WithdrawInfo> {
        let mut params = FormParams::new();
        params
            .push("asset", asset)
            .push("key", key)
            .push("amount", amount);
        self.private_post(private::WITHDRAW_INFO, &params).await
    }

    #[instrument(skip(self))]
    async fn withdraw(&self, asset: &str, key: &str, amount: Decimal) -> RestResult<ReferenceId> {
        let mut params = FormParams::new();
        params
            .push("asset", asset)
            .push("key", key)
            .push("amount", amount);
        self.private_post(private::WITHDRAW, &params).await
    }

    #[instrument(skip(self))]
    async fn withdraw_status(
        &self,
        asset: Option<&str>,
        method: Option<&str>,
    ) -> RestResult<Vec<TransferStatus>> {
        let mut params = FormParams::new();
        params.push_opt("asset", asset).push_opt("method", method);
        self.private_post(private::WITHDRAW_STATUS, &params).await
    }

    #[instrument(skip(self))]
    async fn withdraw_cancel(&self, asset: &str, refid: &str) -> RestResult<bool> {
        let mut params = FormParams::new();
        params.push("asset", asset).push("refid", refid);
        self.private_post(private::WITHDRAW_CANCEL, &params).await
    }

    #[instrument(skip(self))]
    async fn wallet_transfer(
        &self,
        asset: &str,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> RestResult<ReferenceId> {
        let mut params = FormParams::new();
        params
            .push("asset", asset)
            .push("from", from)
            .push("to", to)
            .push("amount", amount);
        self.private_post(private::WALLET_TRANSFER, &params).await
    }
}

// Response types specific to funding endpoints

/// Deposit method
#[derive(Debug, Clone, Deserialize)]
pub struct DepositMethod {
    /// Method name
    pub method: String,
    /// Maximum net amount that can be deposited right now; empty when unlimited
    #[serde(default, deserialize_with = "optional_limit::deserialize")]
    pub limit: String,
    /// Fee for this method
    pub fee: Option<String>,
    /// Address setup fee
    #[serde(rename = "address-setup-fee")]
    pub address_setup_fee: Option<String>,
    /// Whether new addresses can be generated
    #[serde(default, rename = "gen-address", deserialize_with = "lenient_bool::deserialize")]
    pub gen_address: bool,
    /// Minimum deposit amount
    pub minimum: Option<String>,
}

impl DepositMethod {
    pub fn is_unlimited(&self) -> bool {
        self.limit.is_empty()
    }
}

/// Deposit address
#[derive(Debug, Clone, Deserialize)]
pub struct DepositAddress {
    pub address: String,
    /// Expiration time, `"0"` if the address never expires
    #[serde(
        default = "timestamp_text::default",
        deserialize_with = "timestamp_text::deserialize"
    )]
    pub expiretm: String,
    /// Whether the address was generated by this call
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub new: bool,
    /// Destination tag (XRP and similar)
    pub tag: Option<String>,
    pub memo: Option<String>,
}

/// State of a deposit or withdrawal
#[derive(Debug, Clone, Deserialize)]
pub struct TransferStatus {
    pub method: String,
    pub aclass: Option<String>,
    pub asset: String,
    pub refid: String,
    /// On-chain transaction id (empty until broadcast)
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub info: String,
    pub amount: String,
    pub fee: Option<String>,
    pub time: u64,
    /// `Initial`, `Pending`, `Settled`, `Success` or `Failure`
    pub status: String,
    /// Extra state such as `return` or `onhold`
    #[serde(rename = "status-prop")]
    pub status_prop: Option<String>,
}

/// Withdrawal method
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawMethod {
    pub asset: String,
    pub method: String,
    pub network: Option<String>,
    pub minimum: Option<String>,
}

/// Saved withdrawal address
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawAddress {
    pub address: String,
    pub asset: String,
    pub method: String,
    /// Withdrawal key name used by `withdraw`
    pub key: String,
    pub tag: Option<String>,
    pub memo: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub verified: bool,
}

/// Withdrawal info
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawInfo {
    /// Withdrawal method
    pub method: String,
    /// Maximum net amount that can be withdrawn; empty when unlimited
    #[serde(default, deserialize_with = "optional_limit::deserialize")]
    pub limit: String,
    /// Net amount that will be sent
    pub amount: String,
    /// Fee that will be paid
    pub fee: String,
}

/// Reference ID of a withdrawal or wallet transfer
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceId {
    pub refid: String,
}
