//! Exchange adapter error types
//!
//! All exchange-related errors are wrapped in ExchangeError enum
//! which implements thiserror for consistent error handling.

use thiserror::Error;

/// Exchange-specific error types for adapter operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Malformed or missing argument, rejected before any request is sent
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// Connection to exchange failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Network operation timed out
    #[error("Network timeout after {0}ms")]
    NetworkTimeout(u64),

    /// Exchange answered with a non-success HTTP status
    #[error("{exchange} API invalid HTTP response: {summary}")]
    InvalidHttpResponse {
        exchange: &'static str,
        summary: String,
    },

    /// Exchange answered with a success status but the body is not JSON
    #[error("{exchange} API invalid JSON response: {summary}")]
    InvalidJsonResponse {
        exchange: &'static str,
        summary: String,
    },

    /// Invalid or unexpected response from exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Key parsing or request signing failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Operation is part of the adapter surface but has no exchange call behind it
    #[error("Operation not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
