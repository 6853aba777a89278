//! Shared types for the Kraken REST client
//!
//! This crate holds the pieces every other crate in the workspace agrees on.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`tolerant`] - decoders for fields whose JSON type varies between responses
//! - [`OrderSide`], [`OrderType`], [`TimeInForce`], [`OrderFlag`] - order enums
//! - [`KrakenApiError`], [`KrakenErrorCode`] - structured Kraken error strings

pub mod enums;
pub mod error_codes;
pub mod tolerant;

// Re-export commonly used types
pub use enums::*;
pub use error_codes::*;
pub use tolerant::{DecodeError, MinimumAmount};
