//! dYdX Types
//!
//! Raw REST records returned by the dYdX v1 API and their conversion into
//! the shared `Order` / `Trade` value objects.
//!
//! Order record (`GET /v1/dex/orders`):
//!   {"id": "0x…", "side": "SELL", "price": "250.5", "size": "1.5", …}
//!
//! Fill record (`GET /v1/dex/fills`):
//!   {"uuid": "…", "createdAt": "2019-06-11T16:29:16.823Z", "price": "250.5",
//!    "fillAmount": "1500000000000000000", "status": "CONFIRMED",
//!    "order": {"status": "FILLED", "pair": {"name": "WETH-DAI"}}, …}

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{
    decimal_from_value, decimal_from_wad, is_sell_side, parse_timestamp, Order, Trade,
};

/// Fill status of a settled fill
pub const FILL_STATUS_CONFIRMED: &str = "CONFIRMED";

/// Order status of a fully filled order
pub const ORDER_STATUS_FILLED: &str = "FILLED";

// =============================================================================
// Markets & balances
// =============================================================================

/// A tradable pair as listed by `GET /v1/dex/pairs`
#[derive(Debug, Clone, Deserialize)]
pub struct DydxPair {
    pub name: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DydxPairsResponse {
    pub pairs: Vec<DydxPair>,
}

/// Balance of one market on the account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DydxBalance {
    #[serde(default)]
    pub market_id: Option<u32>,
    #[serde(default)]
    pub wei: Option<String>,
    #[serde(default)]
    pub par: Option<String>,
    #[serde(default)]
    pub pending_wei: Option<String>,
}

/// Account balances keyed by market id
#[derive(Debug, Clone, Deserialize)]
pub struct DydxBalances {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    pub balances: HashMap<String, DydxBalance>,
}

// =============================================================================
// Orders
// =============================================================================

/// Raw open-order record
#[derive(Debug, Clone, Deserialize)]
pub struct DydxOrderRecord {
    pub id: String,
    pub side: String,
    pub price: Value,
    pub size: Value,
}

/// Page of orders returned by `GET /v1/dex/orders`
#[derive(Debug, Clone, Deserialize)]
pub struct DydxOrdersPage {
    pub items: Vec<DydxOrderRecord>,
}

impl Order {
    /// Build an order from a dYdX record; `pair` is the pair the query was made for
    pub fn to_order(record: &DydxOrderRecord, pair: &str) -> ExchangeResult<Order> {
        Order::new(
            record.id.clone(),
            pair,
            is_sell_side(&record.side),
            decimal_from_value("price", &record.price)?,
            decimal_from_value("size", &record.size)?,
        )
        .map_err(|e| match e {
            ExchangeError::Validation(msg) => {
                ExchangeError::InvalidResponse(format!("Order {}: {}", record.id, msg))
            }
            other => other,
        })
    }
}

// =============================================================================
// Fills
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct DydxPairRef {
    pub name: String,
}

/// Parent order embedded in a fill
#[derive(Debug, Clone, Deserialize)]
pub struct DydxFillOrder {
    pub status: String,
    pub pair: DydxPairRef,
}

/// Raw fill record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DydxFillRecord {
    #[serde(default)]
    pub uuid: Option<String>,
    pub created_at: String,
    pub price: Value,
    pub fill_amount: String,
    pub status: String,
    pub order: DydxFillOrder,
}

impl DydxFillRecord {
    /// Settled fill of a fully filled order; nothing else is reported as a trade
    pub fn is_terminal(&self) -> bool {
        self.status == FILL_STATUS_CONFIRMED && self.order.status == ORDER_STATUS_FILLED
    }
}

/// Page of fills returned by `GET /v1/dex/fills`
#[derive(Debug, Clone, Deserialize)]
pub struct DydxFillsPage {
    pub fills: Vec<DydxFillRecord>,
}

impl Trade {
    /// Build a trade from a dYdX fill; the fill amount is in wad units
    pub fn from_fill(fill: &DydxFillRecord) -> ExchangeResult<Trade> {
        let created_at = parse_timestamp("createdAt", &fill.created_at)?;
        Ok(Trade::new(
            fill.uuid.clone(),
            created_at,
            fill.order.pair.name.clone(),
            decimal_from_value("price", &fill.price)?,
            decimal_from_wad("fillAmount", &fill.fill_amount)?,
            created_at,
        ))
    }
}

// =============================================================================
// Cancellation
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DydxCancelledOrder {
    #[serde(default)]
    pub uuid: Option<String>,
}

/// Response of `DELETE /v1/dex/orders/{hash}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DydxCancelResponse {
    #[serde(default)]
    pub order: Option<DydxCancelledOrder>,
}

impl DydxCancelResponse {
    pub fn echoed_order_id(&self) -> Option<&str> {
        self.order.as_ref().and_then(|o| o.uuid.as_deref())
    }
}

/// Decode a typed payload out of a JSON response body
pub fn decode<T: serde::de::DeserializeOwned>(what: &str, value: Value) -> ExchangeResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ExchangeError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
}
