//! Staking endpoints
//!
//! These endpoints require authentication and allow users to:
//! - View stakeable assets and their minimums
//! - Stake and unstake funds
//! - Track pending and completed staking transactions

use async_trait::async_trait;
use kraken_types::tolerant::default_true;
use kraken_types::MinimumAmount;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::client::KrakenRestClient;
use crate::constants::private;
use crate::error::RestResult;
use crate::request::FormParams;

/// Staking endpoints
#[async_trait]
pub trait Staking: Send + Sync {
    /// List assets that can be staked
    async fn stakeable_assets(&self) -> RestResult<Vec<StakingAsset>>;

    /// Stake `amount` of `asset` using a staking `method`
    ///
    /// # Arguments
    /// * `asset` - Asset to stake (e.g., "DOT")
    /// * `amount` - Amount to stake
    /// * `method` - Staking method as listed by [`stakeable_assets`](Self::stakeable_assets)
    async fn stake(&self, asset: &str, amount: Decimal, method: &str) -> RestResult<StakeResult>;

    /// Unstake `amount` of a staked asset (e.g., "DOT.S")
    async fn unstake(&self, asset: &str, amount: Decimal) -> RestResult<StakeResult>;

    /// Stake and unstake requests not yet settled
    async fn pending_staking_transactions(&self) -> RestResult<Vec<StakingTransaction>>;

    /// Recent staking transactions, including rewards
    async fn staking_transactions(&self) -> RestResult<Vec<StakingTransaction>>;
}

#[async_trait]
impl Staking for KrakenRestClient {
    #[instrument(skip(self))]
    async fn stakeable_assets(&self) -> RestResult<Vec<StakingAsset>> {
        self.private_post(private::STAKEABLE_ASSETS, &FormParams::new())
            .await
    }

    #[instrument(skip(self))]
    async fn stake(&self, asset: &str, amount: Decimal, method: &str) -> RestResult<StakeResult> {
        let mut params = FormParams::new();
        params
            .push("asset", asset)
            .push("amount", amount)
            .push("method", method);
        self.private_post(private::STAKE, &params).await
    }

    #[instrument(skip(self))]
    async fn unstake(&self, asset: &str, amount: Decimal) -> RestResult<StakeResult> {
        let mut params = FormParams::new();
        params.push("asset", asset).push("amount", amount);
        self.private_post(private::UNSTAKE, &params).await
    }

    #[instrument(skip(self))]
    async fn pending_staking_transactions(&self) -> RestResult<Vec<StakingTransaction>> {
        self.private_post(private::STAKING_PENDING, &FormParams::new())
            .await
    }

    #[instrument(skip(self))]
    async fn staking_transactions(&self) -> RestResult<Vec<StakingTransaction>> {
        self.private_post(private::STAKING_TRANSACTIONS, &FormParams::new())
            .await
    }
}

// Response types specific to staking endpoints

/// Stakeable asset
///
/// Kraken leaves out the capability flags when they hold, so each defaults
/// to `true`.
#[derive(Debug, Clone, Deserialize)]
pub struct StakingAsset {
    /// Unique ID of the staking option, used as `method` when staking
    pub method: String,
    /// Asset code (e.g., "DOT")
    pub asset: String,
    /// Staked asset code (e.g., "DOT.S")
    pub staking_asset: String,
    pub rewards: Option<StakingRewards>,
    /// Staking happens on chain
    #[serde(default = "default_true::default", deserialize_with = "default_true::deserialize")]
    pub on_chain: bool,
    #[serde(default = "default_true::default", deserialize_with = "default_true::deserialize")]
    pub can_stake: bool,
    #[serde(default = "default_true::default", deserialize_with = "default_true::deserialize")]
    pub can_unstake: bool,
    #[serde(default = "default_true::default", deserialize_with = "default_true::deserialize")]
    pub enabled_for_user: bool,
    #[serde(default)]
    pub minimum_amount: MinimumAmount,
    /// Days until staked funds are tradeable
    pub lock: Option<serde_json::Value>,
}

/// Reward rate of a stakeable asset
#[derive(Debug, Clone, Deserialize)]
pub struct StakingRewards {
    /// Reward earned while staking, in percent
    pub reward: String,
    /// Reward type, usually `percentage`
    #[serde(rename = "type")]
    pub reward_type: String,
}

/// Stake or unstake result
#[derive(Debug, Clone, Deserialize)]
pub struct StakeResult {
    /// Reference ID of the staking transaction
    pub refid: String,
}

/// Staking transaction
#[derive(Debug, Clone, Deserialize)]
pub struct StakingTransaction {
    pub refid: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub asset: String,
    pub amount: String,
    pub fee: Option<String>,
    pub time: u64,
    /// `Initial`, `Pending`, `Settled`, `Success` or `Failure`
    pub status: String,
    pub method: Option<String>,
    pub aclass: Option<String>,
    pub bond_start: Option<u64>,
    pub bond_end: Option<u64>,
}
