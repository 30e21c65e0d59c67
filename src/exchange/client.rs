//! Delta Exchange India REST API client.

use crate::config::DeltaConfig;
use crate::exchange::error::{ExchangeError, Result};
use crate::exchange::traits::OptionsExchange;
use crate::exchange::types::*;
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, instrument};

/// Production base URL for Delta Exchange India.
pub const DELTA_INDIA_BASE_URL: &str = "https://api.india.delta.exchange";

const PRODUCTS_PATH: &str = "/v2/products";
const TICKERS_PATH: &str = "/v2/tickers";
const ORDERS_PATH: &str = "/v2/orders";

/// Compute the hex HMAC-SHA256 signature Delta expects on private calls.
///
/// The signed message is `method + timestamp + path + query_string + payload`.
pub fn sign_request(
    secret: &str,
    method: &str,
    timestamp: &str,
    path: &str,
    query_string: &str,
    payload: &str,
) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(method.as_bytes());
    mac.update(timestamp.as_bytes());
    mac.update(path.as_bytes());
    mac.update(query_string.as_bytes());
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Render query parameters as `?k=v&...`, or an empty string when there are none.
pub fn canonical_query(params: &QueryParams) -> String {
    if params.is_empty() {
        return String::new();
    }
    let joined = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{}", joined)
}

/// Delta Exchange REST client with HMAC request signing.
pub struct DeltaClient {
    http: Client,
    api_key: String,
    api_secret: String,
    base_url: String,
}

impl DeltaClient {
    /// Create a new Delta client from configuration.
    pub fn new(config: &DeltaConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExchangeError::Client(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and unwrap the response envelope.
    ///
    /// Any non-2xx status is surfaced as [`ExchangeError::Http`]; nothing is retried.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<String>,
        auth: bool,
    ) -> Result<T> {
        let query_string = params.map(canonical_query).unwrap_or_default();
        let payload = body.unwrap_or_default();
        let url = format!("{}{}{}", self.base_url, path, query_string);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        if auth {
            let timestamp = Utc::now().timestamp().to_string();
            let signature = sign_request(
                &self.api_secret,
                method.as_str(),
                &timestamp,
                path,
                &query_string,
                &payload,
            );
            request = request
                .header("api-key", &self.api_key)
                .header("timestamp", timestamp)
                .header("signature", signature);
        }

        if !payload.is_empty() {
            request = request.body(payload);
        }

        debug!(%method, %path, %query_string, auth, "Sending Delta request");

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ExchangeError::http(status.as_u16(), text));
        }

        serde_json::from_str::<ApiEnvelope<T>>(&text)
            .map(ApiEnvelope::into_result)
            .map_err(|e| ExchangeError::decode(path, e.to_string()))
    }
}

#[async_trait]
impl OptionsExchange for DeltaClient {
    // ==================== Market Data (Public) ====================

    #[instrument(skip(self))]
    async fn get_products(&self) -> Result<Vec<Product>> {
        self.request(Method::GET, PRODUCTS_PATH, None, None, false)
            .await
    }

    #[instrument(skip(self))]
    async fn get_tickers(&self, params: &QueryParams) -> Result<Vec<Ticker>> {
        self.request(Method::GET, TICKERS_PATH, Some(params), None, false)
            .await
    }

    #[instrument(skip(self))]
    async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        let path = format!("{}/{}", TICKERS_PATH, symbol);
        self.request(Method::GET, &path, None, None, false).await
    }

    // ==================== Orders (Authenticated) ====================

    #[instrument(skip(self))]
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderRecord> {
        let payload = serde_json::to_string(order)?;
        self.request(Method::POST, ORDERS_PATH, None, Some(payload), true)
            .await
    }

    #[instrument(skip(self))]
    async fn get_orders(&self, params: &QueryParams) -> Result<Vec<OrderRecord>> {
        self.request(Method::GET, ORDERS_PATH, Some(params), None, true)
            .await
    }

    #[instrument(skip(self))]
    async fn amend_order(&self, amendment: &OrderAmendment) -> Result<OrderRecord> {
        let payload = serde_json::to_string(amendment)?;
        self.request(Method::PUT, ORDERS_PATH, None, Some(payload), true)
            .await
    }
}
