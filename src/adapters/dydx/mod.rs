//! dYdX exchange adapter module
//!
//! Thin façade over the dYdX v1 REST API. This module is organized into submodules:
//! - `config` - Configuration and environment loading
//! - `types` - API records and their conversion into `Order` / `Trade`
//! - `signing` - EIP-712 signing of cancellations
//! - `client` - `DydxClient` trait and its REST implementation
//! - `adapter` - Main DydxAdapter implementation

pub mod adapter;
pub mod client;
pub mod config;
pub mod signing;
pub mod types;

pub use adapter::DydxAdapter;
pub use client::{DydxClient, DydxPageQuery, DydxRestClient};
pub use config::DydxConfig;
pub use types::{
    DydxBalance, DydxBalances, DydxCancelResponse, DydxFillRecord, DydxFillsPage,
    DydxOrderRecord, DydxOrdersPage, DydxPair,
};
