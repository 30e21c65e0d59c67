//! Operator notifications.
//!
//! Reports and failures go out through the Telegram Bot API. Delivery is
//! best-effort: callers log a failed send and carry on.

mod telegram;

pub use telegram::{escape_html, TelegramNotifier};

use async_trait::async_trait;

/// A sink for operator-facing text messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to `destination` (a chat id for Telegram).
    async fn send(&self, destination: &str, text: &str) -> anyhow::Result<()>;
}
