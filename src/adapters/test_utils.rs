//! Shared test utilities for adapter testing
//!
//! Provides `MockDydxClient`, a configurable in-memory `DydxClient` that
//! records the queries it receives, and `FixedNonce` for deterministic
//! request signing.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::adapters::dydx::client::{DydxClient, DydxPageQuery};
use crate::adapters::dydx::types::{
    decode, DydxBalances, DydxCancelResponse, DydxFillsPage, DydxOrdersPage, DydxPair,
};
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::leverj::NonceSource;

/// In-memory dYdX client returning canned pages
pub struct MockDydxClient {
    pub pairs: Vec<DydxPair>,
    pub balances: serde_json::Value,
    pub orders: serde_json::Value,
    pub my_fills: serde_json::Value,
    pub all_fills: serde_json::Value,
    pub cancel_response: serde_json::Value,
    /// When true, every call fails with `ConnectionFailed`
    pub should_fail: bool,
    /// Every query received, tagged with the method name
    pub queries: Mutex<Vec<(&'static str, DydxPageQuery)>>,
    /// Every hash passed to `cancel_order`
    pub cancelled: Mutex<Vec<String>>,
}

impl Default for MockDydxClient {
    fn default() -> Self {
        Self {
            pairs: Vec::new(),
            balances: serde_json::json!({"balances": {}}),
            orders: serde_json::json!({"items": []}),
            my_fills: serde_json::json!({"fills": []}),
            all_fills: serde_json::json!({"fills": []}),
            cancel_response: serde_json::json!({}),
            should_fail: false,
            queries: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }
}

impl MockDydxClient {
    /// Create a mock whose every call fails
    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    fn check(&self) -> ExchangeResult<()> {
        if self.should_fail {
            return Err(ExchangeError::ConnectionFailed("mock failure".into()));
        }
        Ok(())
    }

    fn record(&self, method: &'static str, query: &DydxPageQuery) {
        self.queries.lock().unwrap().push((method, query.clone()));
    }

    pub fn recorded_queries(&self) -> Vec<(&'static str, DydxPageQuery)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DydxClient for MockDydxClient {
    async fn get_pairs(&self) -> ExchangeResult<Vec<DydxPair>> {
        self.check()?;
        Ok(self.pairs.clone())
    }

    async fn get_my_balances(&self) -> ExchangeResult<DydxBalances> {
        self.check()?;
        decode("balances", self.balances.clone())
    }

    async fn get_my_orders(&self, query: &DydxPageQuery) -> ExchangeResult<DydxOrdersPage> {
        self.check()?;
        self.record("get_my_orders", query);
        decode("orders", self.orders.clone())
    }

    async fn get_my_fills(&self, query: &DydxPageQuery) -> ExchangeResult<DydxFillsPage> {
        self.check()?;
        self.record("get_my_fills", query);
        decode("fills", self.my_fills.clone())
    }

    async fn get_fills(&self, query: &DydxPageQuery) -> ExchangeResult<DydxFillsPage> {
        self.check()?;
        self.record("get_fills", query);
        decode("fills", self.all_fills.clone())
    }

    async fn cancel_order(&self, order_hash: &str) -> ExchangeResult<DydxCancelResponse> {
        self.check()?;
        self.cancelled.lock().unwrap().push(order_hash.to_string());
        decode("cancel response", self.cancel_response.clone())
    }
}

/// Nonce source that always returns the same value
pub struct FixedNonce(pub u64);

impl NonceSource for FixedNonce {
    fn next_nonce(&self) -> u64 {
        self.0
    }
}
