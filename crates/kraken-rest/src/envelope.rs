//! Response envelope classification
//!
//! Every Kraken response is `{"error": [...], "result": ...}`. A non-empty
//! `error` list is a failure even on HTTP 200, and a `result` may ride along
//! with the errors.

use kraken_types::tolerant::{snippet, string_list};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{ApiFailure, RestError, RestResult, TransportError};
use crate::transport::HttpResponse;

/// Standard Kraken API response wrapper, with the result still raw
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    /// Error messages (empty if successful)
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub error: Vec<String>,
    /// Result data
    #[serde(default)]
    pub result: Option<Value>,
}

/// The `result` member alone, decoded straight from the response bytes
#[derive(Deserialize)]
struct ResultPayload<T> {
    result: T,
}

impl Envelope {
    /// Classify a raw response
    ///
    /// * 2xx with an envelope body → the envelope
    /// * 2xx with anything else → [`RestError::Decode`]
    /// * non-2xx with an envelope carrying errors → the envelope, so the
    ///   errors surface as [`RestError::Api`]
    /// * non-2xx otherwise → [`TransportError::Status`], even when the body
    ///   is JSON (`{"message": ...}`, `{}`)
    pub fn from_response(context: &str, response: &HttpResponse) -> RestResult<Self> {
        let parsed = serde_json::from_slice::<Envelope>(&response.body);
        if !response.is_success() {
            return match parsed {
                Ok(envelope) if !envelope.error.is_empty() => Ok(envelope),
                _ => Err(TransportError::Status {
                    status: response.status,
                    body: snippet(&response.body),
                }
                .into()),
            };
        }
        parsed.map_err(|e| RestError::json(context, &response.body, &e))
    }

    /// Classify a response and decode its result into `T`
    ///
    /// The result is decoded from the original bytes so a failure reports
    /// the offending position in the body as Kraken sent it.
    pub fn result_from_response<T: DeserializeOwned>(
        context: &str,
        response: &HttpResponse,
    ) -> RestResult<T> {
        match Self::from_response(context, response)?.into_value(context)? {
            Value::Null => decode_value(context, Value::Null),
            _ => decode_result(context, &response.body),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    /// Fail with an [`ApiFailure`] when errors are present, else hand back the raw result
    pub fn into_value(self, context: &str) -> RestResult<Value> {
        if !self.error.is_empty() {
            warn!(endpoint = context, errors = ?self.error, "Kraken returned errors");
            return Err(RestError::Api(ApiFailure::new(self.error, self.result)));
        }
        Ok(self.result.unwrap_or(Value::Null))
    }

    /// Decode the result into `T`, failing on any envelope error
    pub fn into_result<T: DeserializeOwned>(self, context: &str) -> RestResult<T> {
        let value = self.into_value(context)?;
        decode_value(context, value)
    }
}

/// Decode the `result` member of a raw envelope body
pub fn decode_result<T: DeserializeOwned>(context: &str, body: &[u8]) -> RestResult<T> {
    serde_json::from_slice::<ResultPayload<T>>(body)
        .map(|payload| payload.result)
        .map_err(|e| RestError::json(context, body, &e))
}

/// Decode an already-extracted result value
pub fn decode_value<T: DeserializeOwned>(context: &str, value: Value) -> RestResult<T> {
    match T::deserialize(&value) {
        Ok(decoded) => Ok(decoded),
        Err(e) => Err(RestError::decode(context, value.to_string().as_bytes(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_success_envelope() {
        let envelope =
            Envelope::from_response("Time", &response(200, r#"{"error":[],"result":{"unixtime":1}}"#))
                .unwrap();
        assert!(envelope.is_success());
        let result: HashMap<String, u64> = envelope.into_result("Time").unwrap();
        assert_eq!(result["unixtime"], 1);
    }

    #[test]
    fn test_error_string_is_accepted() {
        let envelope =
            Envelope::from_response("Balance", &response(200, r#"{"error":"EAPI:Invalid key"}"#))
                .unwrap();
        assert_eq!(envelope.error, vec!["EAPI:Invalid key"]);
    }

    #[test]
    fn test_errors_keep_partial_result() {
        let body = r#"{"error":["EOrder:Unknown order"],"result":{"count":1}}"#;
        let err = Envelope::from_response("CancelOrder", &response(200, body))
            .unwrap()
            .into_value("CancelOrder")
            .unwrap_err();

        let failure = err.api_failure().unwrap();
        assert_eq!(failure.errors, vec!["EOrder:Unknown order"]);
        assert_eq!(failure.partial, Some(serde_json::json!({"count": 1})));
    }

    #[test]
    fn test_envelope_on_error_status_is_api_error() {
        let body = r#"{"error":["EAPI:Invalid nonce"]}"#;
        let err = Envelope::from_response("Balance", &response(400, body))
            .unwrap()
            .into_value("Balance")
            .unwrap_err();
        assert!(matches!(err, RestError::Api(_)));
    }

    #[test]
    fn test_html_error_page_is_transport_error() {
        let err = Envelope::from_response("Time", &response(502, "<html>Bad Gateway</html>"))
            .unwrap_err();
        match err {
            RestError::Transport(TransportError::Status { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.contains("Bad Gateway"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_without_errors_on_error_status_is_transport_error() {
        let err = Envelope::from_response(
            "Time",
            &response(503, r#"{"message":"Service Unavailable"}"#),
        )
        .unwrap_err();
        match &err {
            RestError::Transport(TransportError::Status { status, body }) => {
                assert_eq!(*status, 503);
                assert!(body.contains("Service Unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_retryable());

        let err = Envelope::from_response("Balance", &response(429, "{}")).unwrap_err();
        assert!(matches!(
            err,
            RestError::Transport(TransportError::Status { status: 429, .. })
        ));
        assert!(err.is_rate_limited());

        let body = r#"{"error":[],"result":{"unixtime":1}}"#;
        let err = Envelope::from_response("Time", &response(500, body)).unwrap_err();
        assert!(matches!(
            err,
            RestError::Transport(TransportError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_result_decoded_from_raw_body() {
        let body = r#"{"error":[],"result":{"unixtime":1700000000,"rfc1123":"x"}}"#;
        let result: HashMap<String, serde_json::Value> =
            Envelope::result_from_response("Time", &response(200, body)).unwrap();
        assert_eq!(result["unixtime"], 1700000000);

        let empty: Option<u64> =
            Envelope::result_from_response("Time", &response(200, r#"{"error":[]}"#)).unwrap();
        assert_eq!(empty, None);

        let mut body = String::from(r#"{"error":[],"result":{"#);
        for i in 0..20 {
            body.push_str(&format!(r#""key{i:02}":{i},"#));
        }
        body.push_str(r#""bad":"seven"}}"#);
        let err = Envelope::result_from_response::<HashMap<String, u64>>(
            "Time",
            &response(200, &body),
        )
        .unwrap_err();
        match err {
            RestError::Decode {
                context, snippet, ..
            } => {
                assert_eq!(context, "Time");
                assert!(snippet.contains(r#""bad":"seven""#), "{snippet}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_on_200_is_decode_error() {
        let err = Envelope::from_response("Time", &response(200, "not json")).unwrap_err();
        match err {
            RestError::Decode {
                context, snippet, ..
            } => {
                assert_eq!(context, "Time");
                assert_eq!(snippet, "not json");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_result_shape_mismatch_is_decode_error() {
        let envelope =
            Envelope::from_response("Time", &response(200, r#"{"error":[],"result":[1,2]}"#))
                .unwrap();
        let err = envelope.into_result::<HashMap<String, u64>>("Time").unwrap_err();
        assert!(matches!(err, RestError::Decode { .. }));
    }
}
