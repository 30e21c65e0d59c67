//! Exchange integration for Delta Exchange India.
//!
//! Provides:
//! - A signed REST client for market data and order management
//! - A paper exchange that simulates orders on top of live market data
//! - The `OptionsExchange` trait the strategy executor runs against

mod client;
mod error;
pub mod paper;
mod traits;
mod types;

pub use client::{canonical_query, sign_request, DeltaClient, DELTA_INDIA_BASE_URL};
pub use error::{ExchangeError, Result};
pub use paper::PaperExchange;
#[cfg(test)]
pub use traits::MockOptionsExchange;
pub use traits::OptionsExchange;
pub use types::*;
