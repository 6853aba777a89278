//! Endpoint paths, header names, limits and defaults

/// Production REST base URL
pub const BASE_URL: &str = "https://api.kraken.com";

/// Header carrying the public API key
pub const API_KEY_HEADER: &str = "API-Key";
/// Header carrying the request signature
pub const API_SIGN_HEADER: &str = "API-Sign";
/// Content type of every private request body
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default `User-Agent`
pub const DEFAULT_USER_AGENT: &str = concat!("kraken-rest/", env!("CARGO_PKG_VERSION"));

/// Maximum orders accepted by `AddOrderBatch`
pub const MAX_BATCH_ORDERS: usize = 15;
/// Maximum order ids accepted by `CancelOrderBatch`
pub const MAX_CANCEL_BATCH: usize = 50;

/// Environment variable overriding the base URL
pub const API_URL_ENV: &str = "KRAKEN_API_URL";
/// Environment variable overriding the request timeout (seconds)
pub const TIMEOUT_ENV: &str = "KRAKEN_TIMEOUT_SECS";

/// Public endpoint paths
pub mod public {
    pub const TIME: &str = "/0/public/Time";
    pub const SYSTEM_STATUS: &str = "/0/public/SystemStatus";
    pub const ASSETS: &str = "/0/public/Assets";
    pub const ASSET_PAIRS: &str = "/0/public/AssetPairs";
    pub const TICKER: &str = "/0/public/Ticker";
    pub const OHLC: &str = "/0/public/OHLC";
    pub const DEPTH: &str = "/0/public/Depth";
    pub const TRADES: &str = "/0/public/Trades";
    pub const SPREAD: &str = "/0/public/Spread";
}

/// Private endpoint paths
pub mod private {
    pub const BALANCE: &str = "/0/private/Balance";
    pub const BALANCE_EX: &str = "/0/private/BalanceEx";
    pub const TRADE_BALANCE: &str = "/0/private/TradeBalance";
    pub const OPEN_ORDERS: &str = "/0/private/OpenOrders";
    pub const CLOSED_ORDERS: &str = "/0/private/ClosedOrders";
    pub const QUERY_ORDERS: &str = "/0/private/QueryOrders";
    pub const TRADES_HISTORY: &str = "/0/private/TradesHistory";
    pub const LEDGERS: &str = "/0/private/Ledgers";
    pub const TRADE_VOLUME: &str = "/0/private/TradeVolume";
    pub const WEBSOCKETS_TOKEN: &str = "/0/private/GetWebSocketsToken";
    pub const RETRIEVE_EXPORT: &str = "/0/private/RetrieveExport";

    pub const ADD_ORDER: &str = "/0/private/AddOrder";
    pub const ADD_ORDER_BATCH: &str = "/0/private/AddOrderBatch";
    pub const EDIT_ORDER: &str = "/0/private/EditOrder";
    pub const CANCEL_ORDER: &str = "/0/private/CancelOrder";
    pub const CANCEL_ALL: &str = "/0/private/CancelAll";
    pub const CANCEL_ALL_AFTER: &str = "/0/private/CancelAllOrdersAfter";
    pub const CANCEL_ORDER_BATCH: &str = "/0/private/CancelOrderBatch";

    pub const DEPOSIT_METHODS: &str = "/0/private/DepositMethods";
    pub const DEPOSIT_ADDRESSES: &str = "/0/private/DepositAddresses";
    pub const DEPOSIT_STATUS: &str = "/0/private/DepositStatus";
    pub const WITHDRAW_METHODS: &str = "/0/private/WithdrawMethods";
    pub const WITHDRAW_ADDRESSES: &str = "/0/private/WithdrawAddresses";
    pub const WITHDRAW_INFO: &str = "/0/private/WithdrawInfo";
    pub const WITHDRAW: &str = "/0/private/Withdraw";
    pub const WITHDRAW_STATUS: &str = "/0/private/WithdrawStatus";
    pub const WITHDRAW_CANCEL: &str = "/0/private/WithdrawCancel";
    pub const WALLET_TRANSFER: &str = "/0/private/WalletTransfer";

    pub const STAKEABLE_ASSETS: &str = "/0/private/Staking/Assets";
    pub const STAKE: &str = "/0/private/Stake";
    pub const UNSTAKE: &str = "/0/private/Unstake";
    pub const STAKING_PENDING: &str = "/0/private/Staking/Pending";
    pub const STAKING_TRANSACTIONS: &str = "/0/private/Staking/Transactions";
}
