//! Error types for the stock bot

use thiserror::Error;

/// Stock bot specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Webhook signature did not match the channel secret
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Webhook body could not be decoded
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// A field the reply cannot be built without is absent from the quote
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Provider has no data for the requested symbol
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// LINE Messaging API error
    #[error("LINE API error: {status}: {message}")]
    LineApiError { status: u16, message: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for stock bot operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<stockbot_utils::EnvError> for StockError {
    fn from(err: stockbot_utils::EnvError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}
