//! Configuration types for exchange settings
//!
//! Non-secret connection settings loaded from YAML. Credentials never live
//! here; they come from the environment (see `DydxConfig::from_env`,
//! `LeverjConfig::from_env`).

use serde::{Deserialize, Serialize};

use crate::adapters::dydx::config as dydx_defaults;
use crate::adapters::leverj::config as leverj_defaults;
use crate::adapters::types::timeout_from_secs;
use crate::error::AppError;

// ============================================================================
// Configuration Structs
// ============================================================================

/// dYdX connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DydxSettings {
    /// REST node base URL
    pub node: String,
    /// Per-request timeout in seconds
    pub timeout_secs: f64,
}

impl Default for DydxSettings {
    fn default() -> Self {
        Self {
            node: dydx_defaults::DEFAULT_NODE.to_string(),
            timeout_secs: dydx_defaults::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DydxSettings {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_url("dydx.node", &self.node)?;
        validate_timeout("dydx.timeout_secs", self.timeout_secs)
    }
}

/// LeverJ connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeverjSettings {
    /// REST server, e.g. `https://live.leverj.io`
    pub api_server: String,
    /// API version prefix, e.g. `/api/v1`
    pub api_path: String,
    /// Per-request timeout in seconds
    pub timeout_secs: f64,
}

impl Default for LeverjSettings {
    fn default() -> Self {
        Self {
            api_server: leverj_defaults::DEFAULT_API_SERVER.to_string(),
            api_path: leverj_defaults::DEFAULT_API_PATH.to_string(),
            timeout_secs: leverj_defaults::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LeverjSettings {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_url("leverj.api_server", &self.api_server)?;

        // Rule: api_path is appended to the server verbatim
        if !self.api_path.starts_with('/') {
            return Err(AppError::Config(format!(
                "leverj.api_path must start with '/', got '{}'",
                self.api_path
            )));
        }

        validate_timeout("leverj.timeout_secs", self.timeout_secs)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub dydx: DydxSettings,
    pub leverj: LeverjSettings,
}

impl AppConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), AppError> {
        self.dydx.validate()?;
        self.leverj.validate()?;
        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), AppError> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(AppError::Config(format!(
            "{} must be an http(s) URL, got '{}'",
            field, value
        )));
    }
    Ok(())
}

fn validate_timeout(field: &str, value: f64) -> Result<(), AppError> {
    if timeout_from_secs(value).is_none() {
        return Err(AppError::Config(format!(
            "{} must be a positive number of seconds, got {}",
            field, value
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
