//! Shared adapter types
//!
//! Exchange-neutral value objects (`Order`, `Trade`), exact-decimal and
//! timestamp parsing used at the record boundary, and the HTTP plumbing
//! (client construction, response unwrapping) both adapters share.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

// =============================================================================
// HTTP Client Configuration
// =============================================================================

/// Connection pool: max idle connections per host
const HTTP_POOL_MAX_IDLE: usize = 4;
/// Connection pool: idle timeout (seconds)
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;
/// TCP connect timeout (ms)
const HTTP_CONNECT_TIMEOUT_MS: u64 = 5000;
/// TCP keepalive interval (seconds)
const HTTP_TCP_KEEPALIVE_SECS: u64 = 30;

/// Maximum number of response-body characters kept in an error summary
pub const RESPONSE_SUMMARY_MAX_CHARS: usize = 2048;

/// Number of decimals of an on-chain wad amount
pub const WAD_DECIMALS: u32 = 18;

/// A positive timeout given in seconds, or `None` when it is zero,
/// negative, not finite or too large for a `Duration`
pub fn timeout_from_secs(secs: f64) -> Option<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

/// Create the pooled HTTP client an adapter sends its requests through
///
/// `timeout` is the overall per-request deadline.
pub fn create_http_client(exchange_name: &str, timeout: Duration) -> reqwest::Client {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE)
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .tcp_keepalive(Duration::from_secs(HTTP_TCP_KEEPALIVE_SECS))
        .connect_timeout(Duration::from_millis(HTTP_CONNECT_TIMEOUT_MS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    tracing::info!(
        phase = "init",
        exchange = %exchange_name,
        timeout_ms = timeout.as_millis() as u64,
        connect_timeout_ms = HTTP_CONNECT_TIMEOUT_MS,
        pool_max_idle = HTTP_POOL_MAX_IDLE,
        "HTTP client configured"
    );
    client
}

/// Map a transport-level reqwest failure onto the adapter error taxonomy
pub fn map_transport_error(err: reqwest::Error, timeout: Duration) -> ExchangeError {
    if err.is_timeout() {
        ExchangeError::NetworkTimeout(timeout.as_millis() as u64)
    } else {
        ExchangeError::ConnectionFailed(format!("Request failed: {}", err))
    }
}

/// One-line, bounded description of an HTTP response for error messages
///
/// Format: `"{code} {reason} ({text})"`, CR/LF stripped, text cut at
/// [`RESPONSE_SUMMARY_MAX_CHARS`] characters.
pub fn response_summary(status: StatusCode, body: &str) -> String {
    let text: String = body
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .take(RESPONSE_SUMMARY_MAX_CHARS)
        .collect();
    format!(
        "{} {} ({})",
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        text
    )
}

/// Unwrap a response into JSON: non-2xx and non-JSON bodies are fatal
pub fn parse_json_response(
    exchange: &'static str,
    status: StatusCode,
    body: &str,
) -> ExchangeResult<Value> {
    if !status.is_success() {
        return Err(ExchangeError::InvalidHttpResponse {
            exchange,
            summary: response_summary(status, body),
        });
    }

    serde_json::from_str(body).map_err(|_| ExchangeError::InvalidJsonResponse {
        exchange,
        summary: response_summary(status, body),
    })
}

/// Read a full reqwest response and unwrap it with [`parse_json_response`]
pub async fn read_json_response(
    exchange: &'static str,
    response: reqwest::Response,
) -> ExchangeResult<Value> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        ExchangeError::InvalidResponse(format!("Failed to read response: {}", e))
    })?;

    tracing::debug!(exchange = exchange, status = %status, "Response received");

    parse_json_response(exchange, status, &body)
}

// =============================================================================
// Record-boundary parsing
// =============================================================================

/// Parse an exact decimal from a JSON string or number
///
/// Numbers are parsed from their textual form, so `0.1` stays `0.1`.
pub fn decimal_from_value(field: &str, value: &Value) -> ExchangeResult<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(ExchangeError::InvalidResponse(format!(
                "Field '{}' is not a decimal: {}",
                field, other
            )))
        }
    };
    parse_decimal(field, &text)
}

/// Parse an exact decimal from text, accepting scientific notation
pub fn parse_decimal(field: &str, text: &str) -> ExchangeResult<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| {
            ExchangeError::InvalidResponse(format!(
                "Field '{}' has invalid decimal '{}': {}",
                field, text, e
            ))
        })
}

/// Scale an integer amount in wad base units (10^-18) into a decimal
pub fn decimal_from_wad(field: &str, raw: &str) -> ExchangeResult<Decimal> {
    let units: i128 = raw.trim().parse().map_err(|e| {
        ExchangeError::InvalidResponse(format!(
            "Field '{}' has invalid integer amount '{}': {}",
            field, raw, e
        ))
    })?;
    Decimal::try_from_i128_with_scale(units, WAD_DECIMALS).map_err(|e| {
        ExchangeError::InvalidResponse(format!(
            "Field '{}' amount '{}' out of range: {}",
            field, raw, e
        ))
    })
}

/// Parse an ISO-8601 timestamp into unix seconds
///
/// Timestamps without an offset are read as UTC.
pub fn parse_timestamp(field: &str, text: &str) -> ExchangeResult<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp());
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive).timestamp())
        .map_err(|e| {
            ExchangeError::InvalidResponse(format!(
                "Field '{}' has invalid timestamp '{}': {}",
                field, text, e
            ))
        })
}

/// Side vocabulary: `"sell"` (any case) is a sell, everything else a buy
pub fn is_sell_side(side: &str) -> bool {
    side.eq_ignore_ascii_case("sell")
}

// =============================================================================
// Value objects
// =============================================================================

/// An open order as reported by an exchange
///
/// `amount * price` is computed once here, so an order whose quote value
/// does not fit a `Decimal` is never built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    order_id: String,
    pair: String,
    is_sell: bool,
    price: Decimal,
    amount: Decimal,
    quote_amount: Decimal,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        pair: impl Into<String>,
        is_sell: bool,
        price: Decimal,
        amount: Decimal,
    ) -> ExchangeResult<Self> {
        let quote_amount = amount.checked_mul(price).ok_or_else(|| {
            ExchangeError::Validation(format!(
                "order value overflows: amount {} * price {}",
                amount, price
            ))
        })?;

        Ok(Self {
            order_id: order_id.into(),
            pair: pair.into(),
            is_sell,
            price,
            amount,
            quote_amount,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn is_sell(&self) -> bool {
        self.is_sell
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn sell_to_buy_price(&self) -> Decimal {
        self.price
    }

    pub fn buy_to_sell_price(&self) -> Decimal {
        self.price
    }

    /// Amount still to be received: quote for a sell, base for a buy
    pub fn remaining_buy_amount(&self) -> Decimal {
        if self.is_sell {
            self.quote_amount
        } else {
            self.amount
        }
    }

    /// Amount still to be given away: base for a sell, quote for a buy
    pub fn remaining_sell_amount(&self) -> Decimal {
        if self.is_sell {
            self.amount
        } else {
            self.quote_amount
        }
    }
}

/// A fill as reported by an exchange
///
/// Equality and hashing cover every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trade {
    trade_id: Option<String>,
    timestamp: i64,
    pair: String,
    price: Decimal,
    amount: Decimal,
    created_at: i64,
}

impl Trade {
    pub fn new(
        trade_id: Option<String>,
        timestamp: i64,
        pair: impl Into<String>,
        price: Decimal,
        amount: Decimal,
        created_at: i64,
    ) -> Self {
        Self {
            trade_id,
            timestamp,
            pair: pair.into(),
            price,
            amount,
            created_at,
        }
    }

    pub fn trade_id(&self) -> Option<&str> {
        self.trade_id.as_deref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}
