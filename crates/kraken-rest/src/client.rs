//! Main REST client implementation

use kraken_auth::{default_nonce_source, Credentials, NonceSource, RequestSigner, SignedRequest};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::constants::{API_KEY_HEADER, API_SIGN_HEADER, DEFAULT_USER_AGENT, FORM_CONTENT_TYPE};
use crate::envelope::Envelope;
use crate::error::{RestError, RestResult};
use crate::request::FormParams;
use crate::retry::RetryingTransport;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Kraken REST API client
///
/// Provides access to both public and private endpoints through the
/// [`MarketData`](crate::MarketData), [`AccountData`](crate::AccountData),
/// [`Trading`](crate::Trading), [`Funding`](crate::Funding) and
/// [`Staking`](crate::Staking) traits.
///
/// # Example
///
/// ```no_run
/// use kraken_rest::{Credentials, KrakenRestClient, AccountData, MarketData};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = KrakenRestClient::new()?;
///     let ticker = client.ticker(&["XBTUSD"]).await?;
///
///     // With authentication for private endpoints
///     let creds = Credentials::from_env()?;
///     let auth_client = KrakenRestClient::with_credentials(creds)?;
///     let balance = auth_client.balance().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct KrakenRestClient {
    transport: Arc<dyn Transport>,
    credentials: Option<Arc<Credentials>>,
    nonce: Arc<dyn NonceSource>,
    base_url: String,
}

impl KrakenRestClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a client configured from `KRAKEN_*` environment variables
    pub fn from_env() -> RestResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs), user_agent)?;
        let transport = RetryingTransport::new(transport, config.retry.clone());

        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client sending through a caller-provided transport
    ///
    /// Timeout, user agent and retry settings in `config` are the
    /// transport's business and are ignored here.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        info!(
            base_url = %config.base_url,
            authenticated = config.credentials.is_some(),
            "Created Kraken REST client"
        );

        Self {
            transport,
            credentials: config.credentials.map(Arc::new),
            nonce: config.nonce_source.unwrap_or_else(default_nonce_source),
            base_url: config.base_url,
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn credentials(&self) -> RestResult<&Credentials> {
        self.credentials.as_deref().ok_or(RestError::AuthRequired)
    }

    /// Build the signed request for `path` without sending it
    ///
    /// Consumes a nonce, so a request built here and never sent is harmless
    /// but one built here and sent twice is rejected.
    pub fn signed_request(&self, path: &str, params: &FormParams) -> RestResult<SignedRequest> {
        let credentials = self.credentials()?;
        let nonce = self.nonce.next_nonce();
        let body = params.encode_with_nonce(nonce)?;

        Ok(RequestSigner::new(credentials, path, nonce).sign(body))
    }

    /// GET a public endpoint and decode its result
    pub(crate) async fn public_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &FormParams,
    ) -> RestResult<T> {
        let mut url = format!("{}{}", self.base_url, path);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.encode()?);
        }

        debug!(endpoint = path, "Public request");
        let response = self.transport.execute(HttpRequest::get(url)).await?;

        Envelope::result_from_response(path, &response)
    }

    async fn send_signed(&self, path: &str, params: &FormParams) -> RestResult<HttpResponse> {
        let signed = self.signed_request(path, params)?;
        debug!(endpoint = path, nonce = signed.nonce, "Private request");

        let request = HttpRequest::post(format!("{}{}", self.base_url, signed.path), signed.body)
            .with_header(API_KEY_HEADER, signed.api_key)
            .with_header(API_SIGN_HEADER, signed.signature)
            .with_header("Content-Type", FORM_CONTENT_TYPE);

        Ok(self.transport.execute(request).await?)
    }

    /// POST a private endpoint and return the classified envelope
    pub(crate) async fn private_envelope(
        &self,
        path: &str,
        params: &FormParams,
    ) -> RestResult<Envelope> {
        let response = self.send_signed(path, params).await?;
        Envelope::from_response(path, &response)
    }

    /// POST a private endpoint and decode its result
    pub(crate) async fn private_post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &FormParams,
    ) -> RestResult<T> {
        let response = self.send_signed(path, params).await?;
        Envelope::result_from_response(path, &response)
    }

    /// POST a private endpoint whose success body is opaque bytes
    ///
    /// A non-2xx status is never a payload: it is either an envelope with
    /// errors or a transport failure. A JSON body on a 2xx means Kraken
    /// answered with an envelope instead of the payload.
    pub(crate) async fn private_bytes(&self, path: &str, params: &FormParams) -> RestResult<Vec<u8>> {
        let response = self.send_signed(path, params).await?;

        if !response.is_success() || response.is_json() || response.body.first() == Some(&b'{') {
            Envelope::from_response(path, &response)?.into_value(path)?;
            return Err(RestError::decode(
                path,
                &response.body,
                "expected binary payload, got an envelope without errors",
            ));
        }

        Ok(response.body)
    }
}

impl std::fmt::Debug for KrakenRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}
