//! Exchange adapters for dYdX and LeverJ
//!
//! Each adapter turns one exchange's REST responses into the shared
//! `Order` / `Trade` value objects or returns the raw JSON payload.

pub mod errors;
pub mod types;
pub mod dydx;
pub mod leverj;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types for convenience
pub use errors::{ExchangeError, ExchangeResult};
pub use types::{Order, Trade};
pub use dydx::{DydxAdapter, DydxClient, DydxConfig, DydxRestClient};
pub use leverj::{ClockNonce, LeverjAdapter, LeverjConfig, NonceSource};
