//! Error types for the Delta Exchange REST client.

use thiserror::Error;

/// Errors raised at the exchange boundary.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Non-2xx response from the exchange.
    #[error("exchange returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Timeout, connection refused, TLS failure and friends.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the JSON shape we expected.
    #[error("failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    /// Request body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ExchangeError {
    /// Creates an HTTP error from status code and body.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error for the given endpoint path.
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;
