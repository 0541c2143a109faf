//! LeverJ Configuration
//!
//! Configuration for LeverJ exchange connection including environment loading.

use std::time::Duration;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::timeout_from_secs;
use crate::config::LeverjSettings;

// =============================================================================
// Constants
// =============================================================================

/// LeverJ REST server
pub const DEFAULT_API_SERVER: &str = "https://live.leverj.io";

/// API version prefix prepended to every resource
pub const DEFAULT_API_PATH: &str = "/api/v1";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

/// Hardhat account #2 private key (well-known, public test key)
#[cfg(test)]
pub const TEST_API_SECRET: &str =
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

/// Hardhat account #2 address
#[cfg(test)]
pub const TEST_SIGNER_ADDRESS: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for LeverJ exchange connection
#[derive(Debug, Clone)]
pub struct LeverjConfig {
    /// REST server, e.g. `https://live.leverj.io`
    pub api_server: String,
    /// API version prefix, e.g. `/api/v1`
    pub api_path: String,
    /// Account the API key belongs to
    pub account_id: String,
    /// API key id sent in the Authorization header
    pub api_key: String,
    /// Private key (hex) the API key was registered with; signs every request
    pub api_secret: String,
    /// Per-request timeout in seconds
    pub timeout_secs: f64,
}

impl LeverjConfig {
    pub fn new(
        api_server: impl Into<String>,
        account_id: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        timeout_secs: f64,
    ) -> Self {
        Self {
            api_server: api_server.into(),
            api_path: DEFAULT_API_PATH.to_string(),
            account_id: account_id.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            timeout_secs,
        }
    }

    /// Build from YAML settings plus account credentials
    pub fn from_settings(
        settings: &LeverjSettings,
        account_id: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_path: settings.api_path.clone(),
            ..Self::new(
                settings.api_server.clone(),
                account_id,
                api_key,
                api_secret,
                settings.timeout_secs,
            )
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> ExchangeResult<Self> {
        crate::config::load_env_file();

        let account_id = required_env("LEVERJ_ACCOUNT_ID")?;
        let api_key = required_env("LEVERJ_API_KEY")?;
        let api_secret = required_env("LEVERJ_API_SECRET")?;

        let api_server =
            std::env::var("LEVERJ_API_SERVER").unwrap_or_else(|_| DEFAULT_API_SERVER.to_string());
        let timeout_secs = std::env::var("LEVERJ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Self::new(api_server, account_id, api_key, api_secret, timeout_secs);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ExchangeResult<()> {
        if self.api_server.trim().is_empty() {
            return Err(ExchangeError::Validation("LeverJ api_server must not be empty".into()));
        }
        if !self.api_path.is_empty() && !self.api_path.starts_with('/') {
            return Err(ExchangeError::Validation(format!(
                "LeverJ api_path must start with '/' (got '{}')",
                self.api_path
            )));
        }
        if self.account_id.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(ExchangeError::AuthenticationFailed(
                "LeverJ account_id, api_key and api_secret are required".into(),
            ));
        }
        if timeout_from_secs(self.timeout_secs).is_none() {
            return Err(ExchangeError::Validation(format!(
                "LeverJ timeout must be a positive number of seconds (got {})",
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

    /// Full URL of a resource under `api_path`
    pub fn url(&self, api_path: &str, resource: &str) -> String {
        format!("{}{}{}", self.api_server.trim_end_matches('/'), api_path, resource)
    }
}

fn required_env(name: &str) -> ExchangeResult<String> {
    let value = std::env::var(name)
        .map_err(|_| ExchangeError::AuthenticationFailed(format!("{} not set", name)))?;
    if value.is_empty() {
        return Err(ExchangeError::AuthenticationFailed(format!("{} is empty", name)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_url() {
        let config = LeverjConfig::new("https://test.leverj.io/", "A", "K", TEST_API_SECRET, 10.0);
        assert_eq!(
            config.url(&config.api_path, "/account"),
            "https://test.leverj.io/api/v1/account"
        );
    }

    #[test]
    fn test_config_validate() {
        let config = LeverjConfig::new(DEFAULT_API_SERVER, "A", "K", TEST_API_SECRET, 10.0);
        assert!(config.validate().is_ok());

        let config = LeverjConfig::new(DEFAULT_API_SERVER, "", "K", TEST_API_SECRET, 10.0);
        assert!(matches!(config.validate(), Err(ExchangeError::AuthenticationFailed(_))));

        let config = LeverjConfig::new(DEFAULT_API_SERVER, "A", "K", TEST_API_SECRET, -1.0);
        assert!(matches!(config.validate(), Err(ExchangeError::Validation(_))));
    }

    #[test]
    fn test_config_rejects_unrepresentable_timeout() {
        let config = LeverjConfig::new(DEFAULT_API_SERVER, "A", "K", TEST_API_SECRET, 1e300);
        assert!(matches!(config.validate(), Err(ExchangeError::Validation(_))));
        assert_eq!(config.timeout(), Duration::from_secs(10));

        let result = crate::adapters::leverj::LeverjAdapter::new(config);
        assert!(matches!(result, Err(ExchangeError::Validation(_))));
    }

    #[test]
    fn test_config_rejects_relative_api_path() {
        let mut config = LeverjConfig::new(DEFAULT_API_SERVER, "A", "K", TEST_API_SECRET, 10.0);
        config.api_path = "api/v1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_settings_keeps_api_path() {
        let settings = LeverjSettings {
            api_server: "https://test.leverj.io".to_string(),
            api_path: "/api/v2".to_string(),
            timeout_secs: 5.0,
        };
        let config = LeverjConfig::from_settings(&settings, "A", "K", TEST_API_SECRET);
        assert_eq!(config.api_path, "/api/v2");
        assert_eq!(config.api_server, "https://test.leverj.io");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_from_env_missing_vars() {
        std::env::remove_var("LEVERJ_ACCOUNT_ID");
        let result = LeverjConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_credentials() {
        std::env::set_var("LEVERJ_ACCOUNT_ID", "0xaccount");
        std::env::set_var("LEVERJ_API_KEY", "0xapikey");
        std::env::set_var("LEVERJ_API_SECRET", TEST_API_SECRET);
        std::env::set_var("LEVERJ_TIMEOUT_SECS", "2.5");
        std::env::remove_var("LEVERJ_API_SERVER");

        let config = LeverjConfig::from_env().unwrap();
        assert_eq!(config.account_id, "0xaccount");
        assert_eq!(config.api_server, DEFAULT_API_SERVER);
        assert_eq!(config.timeout_secs, 2.5);

        for name in ["LEVERJ_ACCOUNT_ID", "LEVERJ_API_KEY", "LEVERJ_API_SECRET", "LEVERJ_TIMEOUT_SECS"] {
            std::env::remove_var(name);
        }
    }
}
