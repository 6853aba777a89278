//! Order, ledger and query enumerations with their wire spellings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implements `as_str` + `Display` from a single variant → wire-string table
macro_rules! wire_enum {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire representation used in request parameters
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

wire_enum!(OrderSide { Buy => "buy", Sell => "sell" });

impl OrderSide {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// Order types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// Executes immediately at the best available price
    Market,
    /// Executes at the given price or better
    Limit,
    StopLoss,
    TakeProfit,
    StopLossLimit,
    TakeProfitLimit,
    TrailingStop,
    TrailingStopLimit,
    SettlePosition,
}

wire_enum!(OrderType {
    Market => "market",
    Limit => "limit",
    StopLoss => "stop-loss",
    TakeProfit => "take-profit",
    StopLossLimit => "stop-loss-limit",
    TakeProfitLimit => "take-profit-limit",
    TrailingStop => "trailing-stop",
    TrailingStopLimit => "trailing-stop-limit",
    SettlePosition => "settle-position",
});

impl OrderType {
    /// Whether a primary `price` is required
    pub fn requires_price(&self) -> bool {
        !matches!(self, Self::Market | Self::SettlePosition)
    }

    /// Whether a secondary `price2` is required
    pub fn requires_price2(&self) -> bool {
        matches!(
            self,
            Self::StopLossLimit | Self::TakeProfitLimit | Self::TrailingStopLimit
        )
    }
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled
    #[serde(rename = "GTC")]
    GoodTillCancelled,
    /// Immediate or cancel
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    /// Good till date (requires `expiretm`)
    #[serde(rename = "GTD")]
    GoodTillDate,
}

wire_enum!(TimeInForce {
    GoodTillCancelled => "GTC",
    ImmediateOrCancel => "IOC",
    GoodTillDate => "GTD",
});

/// Order flags, sent comma-separated in `oflags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderFlag {
    /// Post-only (maker only)
    PostOnly,
    /// Fee in base currency
    FeeInBase,
    /// Fee in quote currency
    FeeInQuote,
    /// Disable market price protection
    NoMarketPriceProtection,
    /// Volume expressed in quote currency
    VolumeInQuote,
}

wire_enum!(OrderFlag {
    PostOnly => "post",
    FeeInBase => "fcib",
    FeeInQuote => "fciq",
    NoMarketPriceProtection => "nompp",
    VolumeInQuote => "viqc",
});

impl OrderFlag {
    /// Join flags into the `oflags` parameter value
    pub fn join(flags: &[OrderFlag]) -> String {
        flags.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(",")
    }
}

/// Price used to trigger stop / take-profit orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerPrice {
    Index,
    Last,
}

wire_enum!(TriggerPrice { Index => "index", Last => "last" });

/// Order status as reported by order queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Open,
    Closed,
    Canceled,
    Expired,
}

wire_enum!(OrderStatus {
    Pending => "pending",
    Open => "open",
    Closed => "closed",
    Canceled => "canceled",
    Expired => "expired",
});

/// Which timestamp a closed-orders range applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CloseTime {
    Open,
    Close,
    #[default]
    Both,
}

wire_enum!(CloseTime { Open => "open", Close => "close", Both => "both" });

/// Ledger entry type filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerType {
    #[default]
    All,
    Deposit,
    Withdrawal,
    Trade,
    Margin,
    Rollover,
    Credit,
    Transfer,
    Settled,
    Staking,
    Sale,
}

wire_enum!(LedgerType {
    All => "all",
    Deposit => "deposit",
    Withdrawal => "withdrawal",
    Trade => "trade",
    Margin => "margin",
    Rollover => "rollover",
    Credit => "credit",
    Transfer => "transfer",
    Settled => "settled",
    Staking => "staking",
    Sale => "sale",
});

/// OHLC interval in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OhlcInterval {
    #[default]
    M1 = 1,
    M5 = 5,
    M15 = 15,
    M30 = 30,
    H1 = 60,
    H4 = 240,
    D1 = 1440,
    W1 = 10080,
    D15 = 21600,
}

impl OhlcInterval {
    /// Returns the interval in minutes
    pub fn minutes(&self) -> u32 {
        *self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_wire_names() {
        assert_eq!(OrderType::StopLossLimit.to_string(), "stop-loss-limit");
        assert_eq!(OrderType::Market.as_str(), "market");
        let parsed: OrderType = serde_json::from_str(r#""take-profit""#).unwrap();
        assert_eq!(parsed, OrderType::TakeProfit);
    }

    #[test]
    fn test_price_requirements() {
        assert!(!OrderType::Market.requires_price());
        assert!(OrderType::Limit.requires_price());
        assert!(OrderType::StopLossLimit.requires_price2());
        assert!(!OrderType::StopLoss.requires_price2());
    }

    #[test]
    fn test_flags_join() {
        assert_eq!(
            OrderFlag::join(&[OrderFlag::PostOnly, OrderFlag::FeeInQuote]),
            "post,fciq"
        );
        assert_eq!(OrderFlag::join(&[]), "");
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.to_string(), "sell");
    }

    #[test]
    fn test_tif_and_status() {
        assert_eq!(TimeInForce::ImmediateOrCancel.to_string(), "IOC");
        let status: OrderStatus = serde_json::from_str(r#""canceled""#).unwrap();
        assert_eq!(status, OrderStatus::Canceled);
    }

    #[test]
    fn test_ohlc_interval_minutes() {
        assert_eq!(OhlcInterval::H4.minutes(), 240);
        assert_eq!(OhlcInterval::default().minutes(), 1);
    }
}
