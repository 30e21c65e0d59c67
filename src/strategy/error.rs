//! Failures of a strangle execution run.

use crate::exchange::ExchangeError;
use thiserror::Error;

/// Everything that can abort a strangle run.
///
/// Nothing is retried or compensated; orders placed before the failure stay live.
#[derive(Debug, Error)]
pub enum StrangleError {
    #[error("spot price not found in ticker for {symbol}")]
    PriceUnavailable { symbol: String },

    #[error("no {asset} options found for expiry {expiry}")]
    NoContractsForExpiry { asset: String, expiry: String },

    #[error("no strikes parsed from option symbols")]
    NoStrikesParsed,

    #[error("selected symbols not available: {call}, {put}")]
    SelectedContractMissing { call: String, put: String },

    #[error("product id missing for {symbol}")]
    ProductIdMissing { symbol: String },

    #[error("premium not found for {symbol}")]
    PremiumUnavailable { symbol: String },

    #[error("price for {symbol} is out of range")]
    PriceOutOfRange { symbol: String },

    #[error("{label} order rejected with HTTP {status}: {body}")]
    OrderPlacementFailed {
        label: String,
        status: u16,
        body: String,
    },

    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error("exchange returned HTTP {status}: {body}")]
    Exchange { status: u16, body: String },

    #[error("unexpected exchange response: {0}")]
    Decode(String),
}

impl StrangleError {
    /// Map an order placement failure, tagging HTTP rejections with the order label.
    pub fn from_order(label: &str, err: ExchangeError) -> Self {
        match err {
            ExchangeError::Http { status, body } => Self::OrderPlacementFailed {
                label: label.to_string(),
                status,
                body,
            },
            other => other.into(),
        }
    }
}

impl From<ExchangeError> for StrangleError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::Http { status, body } => Self::Exchange { status, body },
            ExchangeError::Transport(e) => Self::TransportFailure(e.to_string()),
            ExchangeError::Client(msg) => Self::TransportFailure(msg),
            e @ ExchangeError::Decode { .. } => Self::Decode(e.to_string()),
            e @ ExchangeError::Serialize(_) => Self::Decode(e.to_string()),
        }
    }
}
