//! dYdX Adapter
//!
//! Uniform trading API (`get_orders`, `place_order`, `cancel_order`,
//! `get_trades`, `get_balances`) on top of a [`DydxClient`].

use rust_decimal::Decimal;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{Order, Trade};

use super::client::{DydxClient, DydxPageQuery, DydxRestClient};
use super::config::DydxConfig;
use super::types::{DydxBalances, DydxPair};

/// Page size used when listing fills of every account
const ALL_FILLS_LIMIT: u32 = 10;

fn validate_pair(pair: &str) -> ExchangeResult<()> {
    if pair.trim().is_empty() {
        return Err(ExchangeError::Validation("pair must not be empty".into()));
    }
    if pair.chars().any(char::is_whitespace) {
        return Err(ExchangeError::Validation(format!(
            "pair must not contain whitespace: '{}'",
            pair
        )));
    }
    Ok(())
}

pub struct DydxAdapter<C: DydxClient = DydxRestClient> {
    client: C,
}

impl DydxAdapter<DydxRestClient> {
    /// Create an adapter talking to the dYdX REST API
    pub fn new(config: DydxConfig) -> ExchangeResult<Self> {
        Ok(Self::with_client(DydxRestClient::new(config)?))
    }
}

impl<C: DydxClient> DydxAdapter<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn get_symbols(&self) -> ExchangeResult<Vec<DydxPair>> {
        self.client.get_pairs().await
    }

    pub async fn get_balances(&self) -> ExchangeResult<DydxBalances> {
        self.client.get_my_balances().await
    }

    /// Open orders of the account on `pair`
    pub async fn get_orders(&self, pair: &str) -> ExchangeResult<Vec<Order>> {
        validate_pair(pair)?;

        let page = self.client.get_my_orders(&DydxPageQuery::for_pair(pair)).await?;

        page.items
            .iter()
            .map(|item| Order::to_order(item, pair))
            .collect()
    }

    /// Order placement has no exchange call behind it; arguments are
    /// still validated so a bad call is reported as such.
    pub async fn place_order(
        &self,
        pair: &str,
        is_sell: bool,
        price: Decimal,
        amount: Decimal,
    ) -> ExchangeResult<String> {
        validate_pair(pair)?;
        if price <= Decimal::ZERO {
            return Err(ExchangeError::Validation(format!("price must be positive (got {})", price)));
        }
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::Validation(format!("amount must be positive (got {})", amount)));
        }

        tracing::warn!(
            exchange = "dYdX",
            pair = %pair,
            side = if is_sell { "sell" } else { "buy" },
            price = %price,
            amount = %amount,
            "Order placement is not supported"
        );
        Err(ExchangeError::NotImplemented("dydx place_order"))
    }

    /// Cancel an order; `Ok(true)` only when the exchange echoes the same id back
    pub async fn cancel_order(&self, order_id: &str) -> ExchangeResult<bool> {
        if order_id.trim().is_empty() {
            return Err(ExchangeError::Validation("order_id must not be empty".into()));
        }

        tracing::info!(exchange = "dYdX", order_id = %order_id, "Cancelling order");

        let response = self.client.cancel_order(order_id).await?;

        match response.echoed_order_id() {
            Some(echoed) if echoed == order_id => Ok(true),
            echoed => {
                tracing::warn!(
                    exchange = "dYdX",
                    order_id = %order_id,
                    echoed = ?echoed,
                    "Cancellation did not confirm the requested order"
                );
                Ok(false)
            }
        }
    }

    /// Fills of the account on `pair`
    pub async fn get_trades(&self, pair: &str, page_number: u32) -> ExchangeResult<Vec<Trade>> {
        validate_pair(pair)?;
        if page_number < 1 {
            return Err(ExchangeError::Validation("page_number starts at 1".into()));
        }

        let page = self.client.get_my_fills(&DydxPageQuery::for_pair(pair)).await?;

        page.fills.iter().map(Trade::from_fill).collect()
    }

    /// Most recent settled fills of every account on `pair`
    ///
    /// Only the first page is available.
    pub async fn get_all_trades(&self, pair: &str, page_number: u32) -> ExchangeResult<Vec<Trade>> {
        validate_pair(pair)?;
        if page_number != 1 {
            return Err(ExchangeError::Validation(format!(
                "only page 1 is available (got {})",
                page_number
            )));
        }

        let query = DydxPageQuery::for_pair(pair).with_limit(ALL_FILLS_LIMIT);
        let page = self.client.get_fills(&query).await?;

        page.fills
            .iter()
            .filter(|fill| fill.is_terminal())
            .map(Trade::from_fill)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_utils::MockDydxClient;
    use serde_json::json;
    use std::str::FromStr;

    const ORDER_HASH: &str = "0x5c3a4a8e6c3b8c3f1c8f0b8ad0d1f3f6d6e7a3b2c1d0e9f8a7b6c5d4e3f2a1b0";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fill(uuid: &str, status: &str, order_status: &str) -> serde_json::Value {
        json!({
            "uuid": uuid,
            "createdAt": "2019-06-11T16:29:16.823Z",
            "price": "250",
            "fillAmount": "2000000000000000000",
            "status": status,
            "order": {"status": order_status, "pair": {"name": "WETH-DAI"}}
        })
    }

    #[tokio::test]
    async fn test_get_orders_maps_items() {
        let mock = MockDydxClient {
            orders: json!({"items": [
                {"id": "0x01", "side": "sell", "price": "250", "size": "1"},
                {"id": "0x02", "side": "buy", "price": "249.5", "size": "0.5"}
            ]}),
            ..Default::default()
        };
        let adapter = DydxAdapter::with_client(mock);

        let orders = adapter.get_orders("WETH-DAI").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[0].is_sell());
        assert_eq!(orders[0].pair(), "WETH-DAI");
        assert!(!orders[1].is_sell());
        assert_eq!(orders[1].remaining_sell_amount(), dec("124.75"));

        let queries = adapter.client().recorded_queries();
        assert_eq!(queries, vec![("get_my_orders", DydxPageQuery::for_pair("WETH-DAI"))]);
    }

    #[tokio::test]
    async fn test_get_orders_rejects_empty_pair() {
        let adapter = DydxAdapter::with_client(MockDydxClient::default());
        let result = adapter.get_orders("  ").await;
        assert!(matches!(result, Err(ExchangeError::Validation(_))));
        assert!(adapter.client().recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn test_get_orders_malformed_record_fails() {
        let mock = MockDydxClient {
            orders: json!({"items": [{"id": "0x01", "side": "sell", "price": "abc", "size": "1"}]}),
            ..Default::default()
        };
        let adapter = DydxAdapter::with_client(mock);
        assert!(matches!(
            adapter.get_orders("WETH-DAI").await,
            Err(ExchangeError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_place_order_is_not_implemented() {
        let adapter = DydxAdapter::with_client(MockDydxClient::default());
        let result = adapter.place_order("WETH-DAI", true, dec("250"), dec("1")).await;
        assert!(matches!(result, Err(ExchangeError::NotImplemented(_))));
    }

    #[tokio::test]
    async fn test_place_order_validates_first() {
        let adapter = DydxAdapter::with_client(MockDydxClient::default());
        let result = adapter.place_order("WETH-DAI", false, dec("0"), dec("1")).await;
        assert!(matches!(result, Err(ExchangeError::Validation(_))));
        let result = adapter.place_order("WETH-DAI", false, dec("250"), dec("-1")).await;
        assert!(matches!(result, Err(ExchangeError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cancel_order_echo_matches() {
        let mock = MockDydxClient {
            cancel_response: json!({"order": {"uuid": ORDER_HASH}}),
            ..Default::default()
        };
        let adapter = DydxAdapter::with_client(mock);
        assert!(adapter.cancel_order(ORDER_HASH).await.unwrap());
        assert_eq!(*adapter.client().cancelled.lock().unwrap(), vec![ORDER_HASH.to_string()]);
    }

    #[tokio::test]
    async fn test_cancel_order_echo_mismatch_is_false() {
        let mock = MockDydxClient {
            cancel_response: json!({"order": {"uuid": "0xother"}}),
            ..Default::default()
        };
        let adapter = DydxAdapter::with_client(mock);
        assert!(!adapter.cancel_order(ORDER_HASH).await.unwrap());
    }

    #[tokio::test]
    async fn test_cancel_order_missing_echo_is_false() {
        let adapter = DydxAdapter::with_client(MockDydxClient::default());
        assert!(!adapter.cancel_order(ORDER_HASH).await.unwrap());
    }

    #[tokio::test]
    async fn test_cancel_order_transport_failure_is_error() {
        let adapter = DydxAdapter::with_client(MockDydxClient::with_failure());
        assert!(matches!(
            adapter.cancel_order(ORDER_HASH).await,
            Err(ExchangeError::ConnectionFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_get_trades_maps_all_fills() {
        let mock = MockDydxClient {
            my_fills: json!({"fills": [fill("a", "CONFIRMED", "FILLED"), fill("b", "PENDING", "OPEN")]}),
            ..Default::default()
        };
        let adapter = DydxAdapter::with_client(mock);

        let trades = adapter.get_trades("WETH-DAI", 1).await.unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].amount(), dec("2"));
        assert_eq!(adapter.client().recorded_queries()[0].0, "get_my_fills");
    }

    #[tokio::test]
    async fn test_get_trades_rejects_page_zero() {
        let adapter = DydxAdapter::with_client(MockDydxClient::default());
        assert!(matches!(
            adapter.get_trades("WETH-DAI", 0).await,
            Err(ExchangeError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_get_all_trades_keeps_only_terminal_fills() {
        let mock = MockDydxClient {
            all_fills: json!({"fills": [
                fill("confirmed-filled", "CONFIRMED", "FILLED"),
                fill("pending", "PENDING", "FILLED"),
                fill("partial", "CONFIRMED", "PARTIALLY_FILLED"),
                fill("rejected", "REJECTED", "CANCELED"),
                fill("confirmed-filled-2", "CONFIRMED", "FILLED")
            ]}),
            ..Default::default()
        };
        let adapter = DydxAdapter::with_client(mock);

        let trades = adapter.get_all_trades("WETH-DAI", 1).await.unwrap();
        let ids: Vec<_> = trades.iter().filter_map(|t| t.trade_id()).collect();
        assert_eq!(ids, vec!["confirmed-filled", "confirmed-filled-2"]);

        let queries = adapter.client().recorded_queries();
        assert_eq!(
            queries,
            vec![("get_fills", DydxPageQuery::for_pair("WETH-DAI").with_limit(10))]
        );
    }

    #[tokio::test]
    async fn test_get_all_trades_only_first_page() {
        let adapter = DydxAdapter::with_client(MockDydxClient::default());
        assert!(matches!(
            adapter.get_all_trades("WETH-DAI", 2).await,
            Err(ExchangeError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_get_balances_and_symbols_pass_through() {
        let mock = MockDydxClient {
            balances: json!({"balances": {"1": {"marketId": 1, "wei": "42"}}}),
            ..Default::default()
        };
        let adapter = DydxAdapter::with_client(mock);

        let balances = adapter.get_balances().await.unwrap();
        assert_eq!(balances.balances["1"].wei.as_deref(), Some("42"));
        assert!(adapter.get_symbols().await.unwrap().is_empty());
    }
}
