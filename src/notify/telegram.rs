//! Telegram Bot API notifier.

use super::Notifier;
use crate::config::TelegramConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const SEND_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Escape text for Telegram's HTML parse mode.
///
/// Only `&`, `<` and `>` are significant outside tags.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sends HTML-formatted messages via `sendMessage`.
pub struct TelegramNotifier {
    http: Client,
    bot_token: String,
    api_base_url: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            bot_token: config.bot_token.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base_url, self.bot_token);
        let body = SendMessage {
            chat_id: destination,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send Telegram message")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error {}: {}", status, body);
        }

        debug!(chat_id = %destination, chars = text.len(), "Telegram message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier(base: &str) -> TelegramNotifier {
        TelegramNotifier::new(&TelegramConfig {
            bot_token: "123:abc".to_string(),
            chat_id: "42".to_string(),
            api_base_url: base.to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_message_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({
                "chat_id": "42",
                "text": "<b>hello</b>",
                "parse_mode": "HTML",
                "disable_web_page_preview": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        notifier(&server.uri()).send("42", "<b>hello</b>").await.unwrap();
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("HTTP 502: <html>Bad & gone</html>"),
            "HTTP 502: &lt;html&gt;Bad &amp; gone&lt;/html&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden: bot was blocked"))
            .mount(&server)
            .await;

        let err = notifier(&server.uri()).send("42", "hi").await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
