//! Shared fixtures: a recording transport and captured Kraken payloads

#![allow(dead_code)]

use async_trait::async_trait;
use kraken_rest::{
    ClientConfig, CounterNonce, Credentials, HttpRequest, HttpResponse, KrakenRestClient,
    Transport, TransportError,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Secret from Kraken's signing documentation
pub const DOC_SECRET: &str =
    "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";
pub const DOC_NONCE: u64 = 1616492376594;

/// Transport that records every request and replays canned responses
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a `200` JSON response
    pub fn respond_json(&self, body: &str) -> &Self {
        self.respond(Ok(HttpResponse::json(body)))
    }

    /// Queue a response with an arbitrary status and body
    pub fn respond_raw(&self, status: u16, content_type: &str, body: &[u8]) -> &Self {
        self.respond(Ok(HttpResponse {
            status,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.to_vec(),
        }))
    }

    pub fn respond(&self, response: Result<HttpResponse, TransportError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Http("no canned response".to_string())))
    }
}

/// Client with the documented credentials and a nonce counter at [`DOC_NONCE`]
pub fn private_client(mock: &Arc<MockTransport>) -> KrakenRestClient {
    let config = ClientConfig::new()
        .with_base_url("http://mock")
        .with_credentials(Credentials::new("API_KEY", DOC_SECRET).unwrap())
        .with_nonce_source(Arc::new(CounterNonce::starting_at(DOC_NONCE)));
    KrakenRestClient::with_transport(config, mock.clone())
}

pub fn public_client(mock: &Arc<MockTransport>) -> KrakenRestClient {
    KrakenRestClient::with_transport(ClientConfig::new().with_base_url("http://mock"), mock.clone())
}

/// Form body of a request as key/value pairs
pub fn form(request: &HttpRequest) -> Vec<(String, String)> {
    serde_urlencoded::from_str(request.body.as_deref().unwrap_or_default()).unwrap()
}

pub fn form_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

pub mod payloads {
    pub const BALANCE: &str = r#"{"error":[],"result":{"ZUSD":"171288.6158","XXBT":"0.0000000000","XETH":"0.5000000000"}}"#;

    pub const OPEN_ORDERS: &str = r#"{"error":[],"result":{"open":{
        "OQCLML-BW3P3-BUCMWZ":{"refid":null,"userref":0,"status":"open","opentm":1688666559.8974,
          "starttm":0,"expiretm":0,"descr":{"pair":"XBTUSD","type":"buy","ordertype":"limit",
          "price":"30010.0","price2":"0","leverage":"none","order":"buy 1.25000000 XBTUSD @ limit 30010.0","close":""},
          "vol":"1.25000000","vol_exec":"0.37500000","cost":"11253.7","fee":"0.00000","price":"30010.0",
          "stopprice":"0.00000","limitprice":"0.00000","misc":"","oflags":"fciq",
          "trades":"TCCCTY-WE2O6-P3NB37"}}}}"#;

    pub const ADD_ORDER_BATCH_PARTIAL: &str = r#"{
        "error": ["EOrder:Insufficient funds"],
        "result": {"orders": [
            {"error": "EOrder:Insufficient funds"},
            {"error": ["EGeneral:Invalid arguments", "EOrder:Invalid price"],
             "txid": ["OUF4EM-FRGI2-MQMWZD", "OUF4EM-FRGI2-MQMWZE"]},
            {"txid": "OQCLML-BW3P3-BUCMWZ", "descr": {"order": "buy 1.25 XBTUSD @ limit 27500.0"}}
        ]}
    }"#;

    pub const DEPOSIT_METHODS: &str = r#"{"error":[],"result":[
        {"method":"Bitcoin","limit":false,"fee":"0.0000000000","gen-address":true,"minimum":"0.00010000"},
        {"method":"Bitcoin Lightning","limit":"false","fee":"0.00000000","minimum":"0.00001000"},
        {"method":"Ether (Hex)","limit":4,"fee":"0.0000000000","gen-address":"true"},
        {"method":"SEPA","limit":342.42,"fee":"0.00","address-setup-fee":"0.00"}
    ]}"#;

    pub const STAKEABLE_ASSETS: &str = r#"{"error":[],"result":[
        {"method":"polkadot-staked","asset":"DOT","staking_asset":"DOT.S",
         "rewards":{"reward":"12.00","type":"percentage"}},
        {"method":"ethereum-staked","asset":"ETH","staking_asset":"ETH2",
         "rewards":{"reward":"4.00","type":"percentage"},
         "on_chain":false,"can_stake":true,"can_unstake":false,"enabled_for_user":false,
         "minimum_amount":{"staking":"0.0100000000"}}
    ]}"#;
}
