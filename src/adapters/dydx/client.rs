//! dYdX client
//!
//! `DydxClient` is the narrow SDK surface the adapter delegates to.
//! `DydxRestClient` implements it against the dYdX v1 REST API.

use async_trait::async_trait;
use ethers::signers::{LocalWallet, Signer};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{create_http_client, map_transport_error, read_json_response};

use super::config::DydxConfig;
use super::signing::sign_cancel_order;
use super::types::{
    decode, DydxBalances, DydxCancelResponse, DydxFillsPage, DydxOrdersPage, DydxPair,
    DydxPairsResponse,
};

const EXCHANGE: &str = "dYdX";

/// Pair filter plus pagination for order and fill queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DydxPageQuery {
    pub pairs: Vec<String>,
    pub limit: Option<u32>,
    pub starting_before: Option<String>,
}

impl DydxPageQuery {
    pub fn for_pair(pair: &str) -> Self {
        Self {
            pairs: vec![pair.to_string()],
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("pairs", self.pairs.join(","))];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(before) = &self.starting_before {
            params.push(("startingBefore", before.clone()));
        }
        params
    }
}

/// Operations the dYdX adapter needs from the exchange
#[async_trait]
pub trait DydxClient: Send + Sync {
    /// All tradable pairs
    async fn get_pairs(&self) -> ExchangeResult<Vec<DydxPair>>;

    /// Balances of the client's own account
    async fn get_my_balances(&self) -> ExchangeResult<DydxBalances>;

    /// Open orders of the client's own account
    async fn get_my_orders(&self, query: &DydxPageQuery) -> ExchangeResult<DydxOrdersPage>;

    /// Fills of the client's own account
    async fn get_my_fills(&self, query: &DydxPageQuery) -> ExchangeResult<DydxFillsPage>;

    /// Fills of every account
    async fn get_fills(&self, query: &DydxPageQuery) -> ExchangeResult<DydxFillsPage>;

    /// Cancel an order by its hash
    async fn cancel_order(&self, order_hash: &str) -> ExchangeResult<DydxCancelResponse>;
}

/// REST implementation of [`DydxClient`]
pub struct DydxRestClient {
    config: DydxConfig,
    wallet: LocalWallet,
    address: String,
    http_client: reqwest::Client,
}

impl DydxRestClient {
    pub fn new(config: DydxConfig) -> ExchangeResult<Self> {
        config.validate()?;

        let wallet: LocalWallet = config
            .private_key
            .parse()
            .map_err(|e| ExchangeError::AuthenticationFailed(format!("Invalid private key: {}", e)))?;
        let address = format!("{:?}", wallet.address()).to_lowercase();
        let http_client = create_http_client(EXCHANGE, config.timeout());

        tracing::info!(
            phase = "init",
            exchange = EXCHANGE,
            node = %config.node,
            address = %address,
            "dYdX client created"
        );

        Ok(Self {
            config,
            wallet,
            address,
            http_client,
        })
    }

    /// Account address derived from the private key
    pub fn address(&self) -> &str {
        &self.address
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    async fn get(&self, path: &str, params: &[(&'static str, String)]) -> ExchangeResult<serde_json::Value> {
        let url = self.url(path);
        tracing::debug!(exchange = EXCHANGE, method = "GET", url = %url, "Sending request");

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.config.timeout()))?;

        read_json_response(EXCHANGE, response).await
    }

    fn own_account_params(&self, query: &DydxPageQuery) -> Vec<(&'static str, String)> {
        let mut params = query.to_params();
        params.push(("makerAccountOwner", self.address.clone()));
        params
    }
}

#[async_trait]
impl DydxClient for DydxRestClient {
    async fn get_pairs(&self) -> ExchangeResult<Vec<DydxPair>> {
        let value = self.get("/v1/dex/pairs", &[]).await?;
        let response: DydxPairsResponse = decode("pairs", value)?;
        Ok(response.pairs)
    }

    async fn get_my_balances(&self) -> ExchangeResult<DydxBalances> {
        let path = format!("/v1/accounts/{}", self.address);
        let value = self.get(&path, &[]).await?;
        decode("balances", value)
    }

    async fn get_my_orders(&self, query: &DydxPageQuery) -> ExchangeResult<DydxOrdersPage> {
        let value = self.get("/v1/dex/orders", &self.own_account_params(query)).await?;
        decode("orders", value)
    }

    async fn get_my_fills(&self, query: &DydxPageQuery) -> ExchangeResult<DydxFillsPage> {
        let value = self.get("/v1/dex/fills", &self.own_account_params(query)).await?;
        decode("fills", value)
    }

    async fn get_fills(&self, query: &DydxPageQuery) -> ExchangeResult<DydxFillsPage> {
        let value = self.get("/v1/dex/fills", &query.to_params()).await?;
        decode("fills", value)
    }

    async fn cancel_order(&self, order_hash: &str) -> ExchangeResult<DydxCancelResponse> {
        let signature = sign_cancel_order(&self.wallet, order_hash).await?;
        let url = self.url(&format!("/v1/dex/orders/{}", order_hash));

        tracing::debug!(exchange = EXCHANGE, method = "DELETE", url = %url, "Sending request");

        let response = self
            .http_client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", signature))
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.config.timeout()))?;

        let value = read_json_response(EXCHANGE, response).await?;
        decode("cancel response", value)
    }
}
