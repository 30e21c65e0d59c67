//! Venue interface used by the strategy executor.
//!
//! Lets the executor run against:
//! - the live Delta REST client
//! - the paper exchange (real market data, simulated orders)
//! - generated mocks in tests

use super::error::Result;
use super::types::{OrderAmendment, OrderRecord, OrderRequest, Product, QueryParams, Ticker};
use async_trait::async_trait;

/// Market data and order operations needed to run a strangle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionsExchange: Send + Sync {
    /// List every listed product.
    async fn get_products(&self) -> Result<Vec<Product>>;

    /// List tickers, optionally filtered by query parameters.
    async fn get_tickers(&self, params: &QueryParams) -> Result<Vec<Ticker>>;

    /// Ticker for a single symbol.
    async fn get_ticker(&self, symbol: &str) -> Result<Ticker>;

    /// Place a new order.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderRecord>;

    /// Query orders.
    async fn get_orders(&self, params: &QueryParams) -> Result<Vec<OrderRecord>>;

    /// Edit a resting order.
    async fn amend_order(&self, amendment: &OrderAmendment) -> Result<OrderRecord>;
}
