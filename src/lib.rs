//! Exchange adapters for dYdX and LeverJ
//!
//! - `adapters::dydx` - façade over the dYdX v1 REST API
//! - `adapters::leverj` - signed requests against the LeverJ REST API
//! - `adapters::types` - `Order` / `Trade` value objects and HTTP helpers
//! - `config` - YAML settings, `.env` loading, logging setup

pub mod adapters;
pub mod config;
pub mod error;

pub use adapters::{ExchangeError, ExchangeResult, Order, Trade};
pub use error::AppError;
