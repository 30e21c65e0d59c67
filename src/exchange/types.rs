//! Type definitions for Delta Exchange API requests and responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Query parameters for GET endpoints, rendered in key order.
pub type QueryParams = BTreeMap<String, String>;

/// Response envelope used by Delta.
///
/// Most endpoints answer `{"success": true, "result": ...}` but some proxies
/// and older routes hand back the bare payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiEnvelope<T> {
    Wrapped {
        result: T,
        #[serde(default)]
        success: Option<bool>,
    },
    Bare(T),
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload regardless of envelope shape.
    pub fn into_result(self) -> T {
        match self {
            ApiEnvelope::Wrapped { result, .. } => result,
            ApiEnvelope::Bare(inner) => inner,
        }
    }
}

/// An exchange-listed instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Exchange-assigned id, required to place orders.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub symbol: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Point-in-time price snapshot for a symbol.
///
/// Price fields are kept raw since Delta mixes numeric strings and numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub close: Option<Value>,
    #[serde(default)]
    pub last_price: Option<Value>,
    #[serde(default)]
    pub mark_price: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Order type as accepted by `POST /v2/orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "market_order")]
    Market,
    #[serde(rename = "stop_order")]
    Stop,
}

/// New order request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub order_type: OrderType,
    pub size: u32,
    pub side: OrderSide,
    pub product_id: i64,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub stop_price: Option<Decimal>,
}

impl OrderRequest {
    /// Market order for `size` lots.
    pub fn market(product_id: i64, side: OrderSide, size: u32) -> Self {
        Self {
            order_type: OrderType::Market,
            size,
            side,
            product_id,
            stop_price: None,
        }
    }

    /// Stop order triggering at `stop_price`.
    pub fn stop(product_id: i64, side: OrderSide, size: u32, stop_price: Decimal) -> Self {
        Self {
            order_type: OrderType::Stop,
            size,
            side,
            product_id,
            stop_price: Some(stop_price),
        }
    }
}

/// Edit of a resting order via `PUT /v2/orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderAmendment {
    pub id: i64,
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub limit_price: Option<Decimal>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub stop_price: Option<Decimal>,
}

/// Order as reported back by the exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
