//! API endpoint implementations
//!
//! Each group is a capability trait implemented for
//! [`KrakenRestClient`](crate::KrakenRestClient), so code can depend on only
//! the surface it uses and tests can substitute fakes.

pub mod account;
pub mod funding;
pub mod market;
pub mod staking;
pub mod trading;

pub use account::AccountData;
pub use funding::Funding;
pub use market::MarketData;
pub use staking::Staking;
pub use trading::Trading;

/// The whole Kraken REST surface
pub trait KrakenApi: MarketData + AccountData + Trading + Funding + Staking {}

impl<T> KrakenApi for T where T: MarketData + AccountData + Trading + Funding + Staking {}
