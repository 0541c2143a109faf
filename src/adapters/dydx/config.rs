//! dYdX Configuration
//!
//! Configuration for the dYdX REST client including environment loading.

use std::time::Duration;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::timeout_from_secs;
use crate::config::DydxSettings;

// =============================================================================
// Constants
// =============================================================================

/// dYdX REST API endpoint
pub const DEFAULT_NODE: &str = "https://api.dydx.exchange";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: f64 = 9.5;

/// Hardhat account #1 private key (well-known, public test key)
#[cfg(test)]
pub const TEST_PRIVATE_KEY: &str =
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Hardhat account #1 address
#[cfg(test)]
pub const TEST_ADDRESS: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the dYdX adapter
#[derive(Debug, Clone)]
pub struct DydxConfig {
    /// REST endpoint the client talks to
    pub node: String,
    /// Account private key (hex string, 0x prefix optional)
    pub private_key: String,
    /// Per-request timeout in seconds
    pub timeout_secs: f64,
}

impl DydxConfig {
    pub fn new(node: impl Into<String>, private_key: impl Into<String>, timeout_secs: f64) -> Self {
        Self {
            node: node.into(),
            private_key: private_key.into(),
            timeout_secs,
        }
    }

    /// Build from YAML settings plus the account key
    pub fn from_settings(settings: &DydxSettings, private_key: impl Into<String>) -> Self {
        Self::new(settings.node.clone(), private_key, settings.timeout_secs)
    }

    /// Create configuration from environment variables
    ///
    /// `DYDX_PRIVATE_KEY` is required; `DYDX_NODE` and `DYDX_TIMEOUT_SECS`
    /// fall back to the defaults.
    pub fn from_env() -> ExchangeResult<Self> {
        crate::config::load_env_file();

        let private_key = std::env::var("DYDX_PRIVATE_KEY")
            .map_err(|_| ExchangeError::AuthenticationFailed("DYDX_PRIVATE_KEY not set".into()))?;
        if private_key.is_empty() {
            return Err(ExchangeError::AuthenticationFailed("DYDX_PRIVATE_KEY is empty".into()));
        }

        let node = std::env::var("DYDX_NODE").unwrap_or_else(|_| DEFAULT_NODE.to_string());
        let timeout_secs = std::env::var("DYDX_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Self::new(node, private_key, timeout_secs);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ExchangeResult<()> {
        if self.node.trim().is_empty() {
            return Err(ExchangeError::Validation("dYdX node must not be empty".into()));
        }
        if self.private_key.trim().is_empty() {
            return Err(ExchangeError::AuthenticationFailed("dYdX private key is empty".into()));
        }
        if timeout_from_secs(self.timeout_secs).is_none() {
            return Err(ExchangeError::Validation(format!(
                "dYdX timeout must be a positive number of seconds (got {})",
                self.timeout_secs
            )));
        }
        Ok(())
    }

    /// Request timeout; falls back to the default when `timeout_secs` does not validate
    pub fn timeout(&self) -> Duration {
        timeout_from_secs(self.timeout_secs)
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.node.trim_end_matches('/')
    }
}
