//! # Strangle Bot
//!
//! Sells a same-day BTC options short strangle on Delta Exchange India once a
//! day, protects both legs with stop orders, and reports to Telegram.
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `exchange`: Delta Exchange REST client, request signing, paper trading
//! - `strategy`: Symbol parsing, strike selection, pricing and execution
//! - `bot`: Trigger handling with the single-run lock
//! - `notify`: Telegram delivery
//! - `scheduler`: Daily UTC trigger
//! - `server`: Telegram webhook listener
//! - `utils`: Shared utilities and decimal arithmetic

pub mod bot;
pub mod config;
pub mod exchange;
pub mod notify;
pub mod scheduler;
pub mod server;
pub mod strategy;
pub mod utils;

pub use config::Config;
