//! Configuration module
//!
//! This module provides:
//! - Connection settings types (`AppConfig`, `DydxSettings`, `LeverjSettings`)
//! - YAML loading functionality (`load_config`)
//! - `.env` loading for credentials (`load_env_file`)
//! - Logging initialization (`logging::init_logging`)

pub mod logging;
mod loader;
mod types;

pub use types::{AppConfig, DydxSettings, LeverjSettings};

pub use loader::{load_config, load_config_from_str};

/// Load a `.env` file from the working directory, if any
///
/// Variables already set in the process environment win.
pub fn load_env_file() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
}
