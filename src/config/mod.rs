//! Configuration management for the strangle bot.
//!
//! Loads settings from environment variables and config files.

use crate::exchange::DELTA_INDIA_BASE_URL;
use anyhow::{Context, Result};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Delta Exchange credentials and endpoint
    #[serde(default)]
    pub delta: DeltaConfig,
    /// Telegram bot used for reports and manual triggers
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Strangle parameters
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Daily trigger time
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Webhook listener
    #[serde(default)]
    pub server: ServerConfig,
    /// Live orders or paper trading
    #[serde(default)]
    pub trading_mode: TradingMode,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DeltaConfig {
    /// API key sent in the `api-key` header
    #[serde(default)]
    pub api_key: String,
    /// Secret used for HMAC request signing
    #[serde(default)]
    pub api_secret: String,
    /// REST base URL
    #[serde(default = "default_delta_base_url")]
    pub base_url: String,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    #[serde(default)]
    pub bot_token: String,
    /// Chat that receives reports
    #[serde(default)]
    pub chat_id: String,
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Spot ticker used to price the underlying
    #[serde(default = "default_underlying_symbol")]
    pub underlying_symbol: String,
    /// Asset segment of option symbols (e.g. "BTC" in C-BTC-50000-010125)
    #[serde(default = "default_option_asset")]
    pub option_asset: String,
    /// Distance of the target strikes from spot (0.01 = 1%)
    #[serde(default = "default_strike_offset")]
    pub strike_offset: Decimal,
    /// Lots per leg
    #[serde(default = "default_order_size")]
    pub order_size: u32,
    /// Stop price as a multiple of the premium collected
    #[serde(default = "default_stop_loss_multiplier")]
    pub stop_loss_multiplier: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Daily trigger time in UTC, "HH:MM"
    #[serde(default = "default_daily_at_utc")]
    pub daily_at_utc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the webhook listener binds on 0.0.0.0
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Trading mode: Live (real orders) or Paper (simulated orders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Live,
    Paper,
}

// Default value functions
fn default_delta_base_url() -> String {
    DELTA_INDIA_BASE_URL.to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_underlying_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_option_asset() -> String {
    "BTC".to_string()
}

fn default_strike_offset() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_order_size() -> u32 {
    1
}

fn default_stop_loss_multiplier() -> Decimal {
    Decimal::new(2, 0) // stop at 2x premium = loss capped at 1x premium
}

fn default_daily_at_utc() -> String {
    "07:00".to_string() // 12:30 IST
}

fn default_port() -> u16 {
    10000
}

impl Config {
    /// Load configuration from environment variables and config files.
    ///
    /// Environment keys look like `STRANGLE_DELTA__API_KEY` or `STRANGLE_TRADING_MODE`.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("STRANGLE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.delta.api_key.is_empty(), "delta.api_key is required");
        anyhow::ensure!(
            !self.delta.api_secret.is_empty(),
            "delta.api_secret is required"
        );
        anyhow::ensure!(
            !self.telegram.bot_token.is_empty(),
            "telegram.bot_token is required"
        );
        anyhow::ensure!(!self.telegram.chat_id.is_empty(), "telegram.chat_id is required");

        self.schedule.time()?;

        anyhow::ensure!(
            self.strategy.strike_offset > Decimal::ZERO
                && self.strategy.strike_offset < Decimal::ONE,
            "strike_offset must be between 0 and 1"
        );
        anyhow::ensure!(
            self.strategy.stop_loss_multiplier > Decimal::ONE,
            "stop_loss_multiplier must be greater than 1"
        );
        anyhow::ensure!(self.strategy.order_size >= 1, "order_size must be >= 1");
        anyhow::ensure!(
            self.delta.timeout_secs > 0 && self.delta.connect_timeout_secs > 0,
            "timeouts must be positive"
        );

        Ok(())
    }
}

impl ScheduleConfig {
    /// Parsed daily trigger time.
    pub fn time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.daily_at_utc.trim(), "%H:%M")
            .with_context(|| format!("daily_at_utc must be HH:MM, got {:?}", self.daily_at_utc))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delta: DeltaConfig::default(),
            telegram: TelegramConfig::default(),
            strategy: StrategyConfig::default(),
            schedule: ScheduleConfig::default(),
            server: ServerConfig::default(),
            trading_mode: TradingMode::default(),
        }
    }
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            base_url: default_delta_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base_url: default_telegram_api_url(),
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            underlying_symbol: default_underlying_symbol(),
            option_asset: default_option_asset(),
            strike_offset: default_strike_offset(),
            order_size: default_order_size(),
            stop_loss_multiplier: default_stop_loss_multiplier(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_at_utc: default_daily_at_utc(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for DeltaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeltaConfig")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn complete_config() -> Config {
        let mut config = Config::default();
        config.delta.api_key = "key".to_string();
        config.delta.api_secret = "secret".to_string();
        config.telegram.bot_token = "token".to_string();
        config.telegram.chat_id = "12345".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.strategy.underlying_symbol, "BTCUSDT");
        assert_eq!(config.strategy.option_asset, "BTC");
        assert_eq!(config.delta.base_url, "https://api.india.delta.exchange");
        assert_eq!(config.schedule.daily_at_utc, "07:00");
        assert_eq!(config.server.port, 10000);
        assert_eq!(config.strategy.stop_loss_multiplier, dec!(2));
        assert_eq!(config.trading_mode, TradingMode::Live);
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_missing_secrets_are_fatal() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("delta.api_key"));

        let mut config = complete_config();
        config.telegram.chat_id.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_schedule_time_rejected() {
        let mut config = complete_config();
        config.schedule.daily_at_utc = "7am".to_string();
        assert!(config.validate().is_err());

        config.schedule.daily_at_utc = "23:59".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_schedule_time_parses() {
        let schedule = ScheduleConfig::default();
        assert_eq!(
            schedule.time().unwrap(),
            NaiveTime::from_hms_opt(7, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_strategy_bounds() {
        let mut config = complete_config();
        config.strategy.strike_offset = dec!(1.5);
        assert!(config.validate().is_err());

        let mut config = complete_config();
        config.strategy.stop_loss_multiplier = dec!(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", complete_config());
        assert!(!rendered.contains("\"secret\""));
        assert!(!rendered.contains("\"token\""));
        assert!(rendered.contains("<redacted>"));
    }
}
