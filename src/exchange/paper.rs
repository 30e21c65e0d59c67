//! Paper trading exchange.
//!
//! Market data calls go to a real venue; orders are recorded locally and
//! never leave the process.

use super::error::{ExchangeError, Result};
use super::traits::OptionsExchange;
use super::types::*;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// State reported for simulated market orders.
pub const PAPER_FILLED_STATE: &str = "closed";
/// State reported for simulated stop orders waiting on their trigger.
pub const PAPER_PENDING_STATE: &str = "pending";

/// Simulated order book for paper trading.
#[derive(Debug, Default)]
pub struct PaperTradingState {
    pub orders: Vec<OrderRecord>,
}

/// Exchange wrapper that simulates order placement on top of real market data.
pub struct PaperExchange {
    market: Arc<dyn OptionsExchange>,
    state: Arc<RwLock<PaperTradingState>>,
    order_id_counter: AtomicI64,
}

impl PaperExchange {
    /// Wrap `market` for price and product lookups.
    pub fn new(market: Arc<dyn OptionsExchange>) -> Self {
        Self {
            market,
            state: Arc::new(RwLock::new(PaperTradingState::default())),
            order_id_counter: AtomicI64::new(1),
        }
    }

    /// Number of simulated orders placed so far.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    fn next_order_id(&self) -> i64 {
        self.order_id_counter.fetch_add(1, Ordering::SeqCst)
    }
}

fn decimal_field(value: Option<rust_decimal::Decimal>) -> Value {
    value.map(|d| Value::String(d.to_string())).unwrap_or(Value::Null)
}

#[async_trait]
impl OptionsExchange for PaperExchange {
    async fn get_products(&self) -> Result<Vec<Product>> {
        self.market.get_products().await
    }

    async fn get_tickers(&self, params: &QueryParams) -> Result<Vec<Ticker>> {
        self.market.get_tickers(params).await
    }

    async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        self.market.get_ticker(symbol).await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderRecord> {
        let order_id = self.next_order_id();
        let state = match order.order_type {
            OrderType::Market => PAPER_FILLED_STATE,
            OrderType::Stop => PAPER_PENDING_STATE,
        };

        let mut extra = serde_json::Map::new();
        extra.insert("product_id".to_string(), json!(order.product_id));
        extra.insert("size".to_string(), json!(order.size));
        extra.insert("side".to_string(), serde_json::to_value(order.side)?);
        extra.insert("order_type".to_string(), serde_json::to_value(order.order_type)?);
        extra.insert("stop_price".to_string(), decimal_field(order.stop_price));
        extra.insert("created_at".to_string(), json!(Utc::now().to_rfc3339()));

        let record = OrderRecord {
            id: Some(order_id),
            state: Some(state.to_string()),
            extra,
        };

        self.state.write().await.orders.push(record.clone());

        info!(
            order_id,
            product_id = order.product_id,
            side = ?order.side,
            order_type = ?order.order_type,
            size = order.size,
            stop_price = ?order.stop_price,
            "Paper order recorded"
        );

        Ok(record)
    }

    async fn get_orders(&self, params: &QueryParams) -> Result<Vec<OrderRecord>> {
        let state = self.state.read().await;
        let wanted: Option<Vec<&str>> = params
            .get("states")
            .map(|s| s.split(',').map(str::trim).collect());

        let orders = state
            .orders
            .iter()
            .filter(|o| match (&wanted, o.state.as_deref()) {
                (Some(states), Some(s)) => states.contains(&s),
                (Some(_), None) => false,
                (None, _) => true,
            })
            .cloned()
            .collect();

        Ok(orders)
    }

    async fn amend_order(&self, amendment: &OrderAmendment) -> Result<OrderRecord> {
        let mut state = self.state.write().await;
        let record = state
            .orders
            .iter_mut()
            .find(|o| o.id == Some(amendment.id))
            .ok_or_else(|| {
                ExchangeError::http(
                    404,
                    format!(r#"{{"error":{{"code":"order_not_found","id":{}}}}}"#, amendment.id),
                )
            })?;

        if let Some(size) = amendment.size {
            record.extra.insert("size".to_string(), json!(size));
        }
        if amendment.limit_price.is_some() {
            record
                .extra
                .insert("limit_price".to_string(), decimal_field(amendment.limit_price));
        }
        if amendment.stop_price.is_some() {
            record
                .extra
                .insert("stop_price".to_string(), decimal_field(amendment.stop_price));
        }

        debug!(order_id = amendment.id, "Paper order amended");
        Ok(record.clone())
    }
}
