//! LeverJ Exchange Adapter
//!
//! Authenticated REST access to LeverJ. Every request is signed with the
//! account's Ethereum key over a canonical JSON payload.
//!
//! This module is organized into submodules:
//! - `config` - Configuration and environment loading
//! - `nonce` - Strictly increasing request nonces
//! - `signing` - Canonical JSON, personal-message signing, Authorization header
//! - `adapter` - Main LeverjAdapter implementation

pub mod adapter;
pub mod config;
pub mod nonce;
pub mod signing;

pub use adapter::{LeverjAdapter, NONCE_HEADER};
pub use config::{LeverjConfig, DEFAULT_API_PATH, DEFAULT_API_SERVER, DEFAULT_TIMEOUT_SECS};
pub use nonce::{current_time_ms, ClockNonce, NonceSource};
pub use signing::{
    authorization_header, canonical_json, sign_message, SigningPayload, VrsSignature,
};
