//! LeverJ Adapter
//!
//! Signs and sends authenticated REST requests to LeverJ and unwraps the
//! JSON responses.

use std::sync::Arc;

use ethers::signers::{LocalWallet, Signer};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{create_http_client, map_transport_error, read_json_response};

use super::config::LeverjConfig;
use super::nonce::{ClockNonce, NonceSource};
use super::signing::{authorization_header, canonical_json, sign_message, SigningPayload};

const EXCHANGE: &str = "Leverj";

/// Header carrying the request nonce
pub const NONCE_HEADER: &str = "Nonce";

pub struct LeverjAdapter {
    config: LeverjConfig,
    wallet: LocalWallet,
    nonce_source: Arc<dyn NonceSource>,
    http_client: reqwest::Client,
}

impl LeverjAdapter {
    pub fn new(config: LeverjConfig) -> ExchangeResult<Self> {
        config.validate()?;

        let wallet: LocalWallet = config
            .api_secret
            .parse()
            .map_err(|e| ExchangeError::AuthenticationFailed(format!("Invalid api secret: {}", e)))?;
        let http_client = create_http_client(EXCHANGE, config.timeout());

        tracing::info!(
            phase = "init",
            exchange = EXCHANGE,
            api_server = %config.api_server,
            account_id = %config.account_id,
            signer = ?wallet.address(),
            "LeverJ adapter created"
        );

        Ok(Self {
            config,
            wallet,
            nonce_source: Arc::new(ClockNonce::new()),
            http_client,
        })
    }

    /// Replace the nonce source (shared sources keep nonces unique across adapters)
    pub fn with_nonce_source(mut self, nonce_source: Arc<dyn NonceSource>) -> Self {
        self.nonce_source = nonce_source;
        self
    }

    pub fn config(&self) -> &LeverjConfig {
        &self.config
    }

    /// Account details of the configured account
    pub async fn get_account(&self) -> ExchangeResult<Value> {
        self.http_authenticated(Method::GET, &self.config.api_path, "/account", None)
            .await
    }

    /// Send a signed request to `{api_server}{api_path}{resource}`
    ///
    /// With `body`, the exact canonical JSON that was signed is sent as
    /// `application/json`. Without one, the request carries no body at all
    /// (not the JSON text `null`) and the signed payload has no `body` key.
    pub async fn http_authenticated(
        &self,
        method: Method,
        api_path: &str,
        resource: &str,
        body: Option<&Value>,
    ) -> ExchangeResult<Value> {
        let data = body.map(canonical_json::<Value>).transpose()?;

        let nonce = self.nonce_source.next_nonce();
        let payload = SigningPayload::new(method.as_str(), resource, nonce, body);
        let message = payload.to_canonical_json()?;

        let signature = sign_message(&self.wallet, &message).await?;
        let auth_header = authorization_header(&self.config.account_id, &self.config.api_key, &signature);

        let url = self.config.url(api_path, resource);
        tracing::debug!(
            exchange = EXCHANGE,
            method = %method,
            url = %url,
            nonce = nonce,
            has_body = data.is_some(),
            "Sending authenticated request"
        );

        let mut request = self
            .http_client
            .request(method, &url)
            .header("Authorization", auth_header)
            .header(NONCE_HEADER, nonce.to_string())
            .timeout(self.config.timeout());
        if let Some(data) = data {
            request = request.header(CONTENT_TYPE, "application/json").body(data);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.config.timeout()))?;

        read_json_response(EXCHANGE, response).await
    }
}
