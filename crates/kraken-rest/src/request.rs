//! Form / query parameter building

use crate::error::{RestError, RestResult};

/// Ordered key/value parameters for a query string or form body
///
/// Insertion order is kept, so the encoded body is exactly what was built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Append a parameter when present
    pub fn push_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Append `key=true` when `flag` is set; nothing otherwise
    pub fn push_flag(&mut self, key: impl Into<String>, flag: bool) -> &mut Self {
        if flag {
            self.push(key, "true");
        }
        self
    }

    /// Append a comma-joined list when non-empty
    pub fn push_list<S: AsRef<str>>(&mut self, key: impl Into<String>, values: &[S]) -> &mut Self {
        if !values.is_empty() {
            let joined: Vec<&str> = values.iter().map(|v| v.as_ref()).collect();
            self.push(key, joined.join(","));
        }
        self
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as `application/x-www-form-urlencoded`
    pub fn encode(&self) -> RestResult<String> {
        serde_urlencoded::to_string(&self.pairs)
            .map_err(|e| RestError::Validation(format!("cannot encode parameters: {}", e)))
    }

    /// Encode with `nonce` as the first field, the shape every private body takes
    pub fn encode_with_nonce(&self, nonce: u64) -> RestResult<String> {
        let nonce = nonce.to_string();
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(self.pairs.len() + 1);
        pairs.push(("nonce", nonce.as_str()));
        pairs.extend(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        serde_urlencoded::to_string(&pairs)
            .map_err(|e| RestError::Validation(format!("cannot encode parameters: {}", e)))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}
