//! Tolerant decoders for Kraken's loosely-typed REST fields
//!
//! Kraken encodes the same logical value with different JSON types depending
//! on the endpoint, and an absent field does not always mean the zero value of
//! a strict type. Each strategy below accepts a fixed set of wire shapes and
//! normalizes them into one canonical Rust type:
//!
//! | Strategy | Accepts | Produces | When absent |
//! |---|---|---|---|
//! | [`optional_limit`] | number, string, `false`, `"false"`, `null` | `String` | `""` |
//! | [`default_true`] | boolean, `null` | `bool` | `true` |
//! | [`string_list`] | string, array of strings, `null` | `Vec<String>` | `[]` |
//! | [`lenient_bool`] | boolean, `"true"` / `"false"`, `null` | `bool` | `false` |
//! | [`timestamp_text`] | number, string, `null` | `String` | `"0"` |
//! | [`MinimumAmount`] | object with `staking` / `unstaking` | both populated | `"0"` each |
//!
//! Every strategy exposes a `deserialize` hook for `#[serde(deserialize_with)]`
//! and a `decode` function taking raw JSON bytes. Anything outside the accepted
//! shapes is a [`DecodeError`]; nothing is silently dropped.
//!
//! # Example
//!
//! ```
//! use kraken_types::tolerant::{optional_limit, string_list};
//!
//! assert_eq!(optional_limit::decode(b"false").unwrap(), "");
//! assert_eq!(optional_limit::decode(b"4").unwrap(), "4");
//! assert_eq!(string_list::decode(br#""EOrder:Unknown order""#).unwrap().len(), 1);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of characters of raw input kept in error messages
const SNIPPET_LEN: usize = 160;

/// A raw value matched none of the shapes a decoder accepts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot decode {field}: {message} (raw: {raw})")]
pub struct DecodeError {
    /// Logical field (or decoder) name
    pub field: &'static str,
    /// Truncated raw input
    pub raw: String,
    /// Underlying parser message
    pub message: String,
}

/// Render the first few characters of a raw payload for diagnostics
pub fn snippet(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    if text.chars().count() <= SNIPPET_LEN {
        text.into_owned()
    } else {
        let head: String = text.chars().take(SNIPPET_LEN).collect();
        format!("{}...", head)
    }
}

/// Render the raw payload around a parser position (1-based line, column)
///
/// Short payloads are returned whole. Longer ones keep the text leading up to
/// the position, where the offending value sits.
pub fn snippet_at(raw: &[u8], line: usize, column: usize) -> String {
    if raw.len() <= SNIPPET_LEN || line == 0 {
        return snippet(raw);
    }

    let line_start = raw
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .nth(line.saturating_sub(2))
        .map(|(i, _)| i + 1)
        .filter(|_| line > 1)
        .unwrap_or(0);
    let offset = (line_start + column).min(raw.len());

    let start = offset.saturating_sub(SNIPPET_LEN - SNIPPET_LEN / 4);
    let end = (start + SNIPPET_LEN).min(raw.len());
    let text = String::from_utf8_lossy(&raw[start..end]);

    format!(
        "{}{}{}",
        if start > 0 { "..." } else { "" },
        text,
        if end < raw.len() { "..." } else { "" }
    )
}

/// Decode raw JSON bytes into any deserializable type, labelling failures with `field`
pub fn decode_as<T: DeserializeOwned>(field: &'static str, raw: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(raw).map_err(|e| DecodeError {
        field,
        raw: snippet(raw),
        message: e.to_string(),
    })
}

fn decode_with<T>(
    field: &'static str,
    raw: &[u8],
    hook: impl FnOnce(Value) -> Result<T, serde_json::Error>,
) -> Result<T, DecodeError> {
    let fail = |e: serde_json::Error| DecodeError {
        field,
        raw: snippet(raw),
        message: e.to_string(),
    };
    let value: Value = serde_json::from_slice(raw).map_err(fail)?;
    hook(value).map_err(fail)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Numeric-or-absent limit, e.g. the `limit` of a deposit method
///
/// `false`, `"false"` and `null` all mean "no limit" and become `""`.
/// Numbers keep their JSON text (`4` → `"4"`, `342.42` → `"342.42"`),
/// strings pass through unchanged.
pub mod optional_limit {
    use super::{decode_with, kind, DecodeError};
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null | Value::Bool(false) => Ok(String::new()),
            Value::Bool(true) => Ok("true".to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) if s == "false" => Ok(String::new()),
            Value::String(s) => Ok(s),
            other => Err(de::Error::custom(format!(
                "limit: expected a number, a string, false or null, found {}",
                kind(&other)
            ))),
        }
    }

    pub fn decode(raw: &[u8]) -> Result<String, DecodeError> {
        decode_with("limit", raw, |value| deserialize(value))
    }
}

/// Optional boolean whose documented default is `true`
///
/// Pair with `#[serde(default = "...::default_true::default")]` so an absent
/// field also yields `true`. An explicit `null` is treated as absent.
pub mod default_true {
    use super::{decode_with, kind, DecodeError};
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    pub fn default() -> bool {
        true
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(true),
            Value::Bool(flag) => Ok(flag),
            other => Err(de::Error::custom(format!(
                "default-true flag: expected a boolean or null, found {}",
                kind(&other)
            ))),
        }
    }

    pub fn decode(raw: &[u8]) -> Result<bool, DecodeError> {
        decode_with("default-true flag", raw, |value| deserialize(value))
    }
}

/// A lone string or an array of strings, always surfaced as a list
///
/// Used for transaction ids and error fields. `null` becomes an empty list;
/// pair with `#[serde(default)]` for absent fields.
pub mod string_list {
    use super::{decode_with, kind, DecodeError};
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::String(single) => Ok(vec![single]),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(de::Error::custom(format!(
                        "string list: expected only strings in the array, found {}",
                        kind(&other)
                    ))),
                })
                .collect(),
            other => Err(de::Error::custom(format!(
                "string list: expected a string or an array of strings, found {}",
                kind(&other)
            ))),
        }
    }

    pub fn decode(raw: &[u8]) -> Result<Vec<String>, DecodeError> {
        decode_with("string list", raw, |value| deserialize(value))
    }
}

/// Boolean that sometimes arrives as `"true"` / `"false"`
pub mod lenient_bool {
    use super::{decode_with, kind, DecodeError};
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(false),
            Value::Bool(flag) => Ok(flag),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(de::Error::custom(format!(
                "flag: expected a boolean or \"true\"/\"false\", found {}",
                kind(&other)
            ))),
        }
    }

    pub fn decode(raw: &[u8]) -> Result<bool, DecodeError> {
        decode_with("flag", raw, |value| deserialize(value))
    }
}

/// Unix timestamp sent as a number or a string; `null` becomes `"0"` (never)
///
/// Pair with `#[serde(default = "...::timestamp_text::default")]` so an absent
/// field also yields `"0"`.
pub mod timestamp_text {
    use super::{decode_with, kind, DecodeError};
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    pub fn default() -> String {
        super::zero_amount()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(super::zero_amount()),
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(s),
            other => Err(de::Error::custom(format!(
                "timestamp: expected a number or a string, found {}",
                kind(&other)
            ))),
        }
    }

    pub fn decode(raw: &[u8]) -> Result<String, DecodeError> {
        decode_with("timestamp", raw, |value| deserialize(value))
    }
}

/// Amount rendered as text; numbers keep their JSON text, `null` becomes `"0"`
mod amount_text {
    use super::kind;
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(super::zero_amount()),
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(s),
            other => Err(de::Error::custom(format!(
                "minimum_amount: expected an amount, found {}",
                kind(&other)
            ))),
        }
    }
}

fn zero_amount() -> String {
    "0".to_string()
}

/// Minimum staking / unstaking amounts of a stakeable asset
///
/// Kraken omits either sub-field when it is zero; both default to `"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumAmount {
    /// Minimum amount for a stake request
    #[serde(default = "zero_amount", deserialize_with = "amount_text::deserialize")]
    pub staking: String,
    /// Minimum amount for an unstake request
    #[serde(default = "zero_amount", deserialize_with = "amount_text::deserialize")]
    pub unstaking: String,
}

impl Default for MinimumAmount {
    fn default() -> Self {
        Self {
            staking: zero_amount(),
            unstaking: zero_amount(),
        }
    }
}

impl MinimumAmount {
    /// Decode a `minimum_amount` object from raw JSON bytes
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        decode_as("minimum_amount", raw)
    }
}
