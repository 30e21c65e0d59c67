//! Minimal Telegram webhook listener.
//!
//! Telegram POSTs updates here; a `/strangle` message starts a manual run in
//! the background and the request is acknowledged immediately.

use crate::bot::{parse_command, BotCommand, StrangleBot, TriggerSource};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Deserialize)]
struct TelegramUpdate {
    #[serde(default)]
    message: Option<TelegramMessage>,
    #[serde(default)]
    edited_message: Option<TelegramMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct TelegramMessage {
    #[serde(default)]
    text: Option<String>,
}

/// Routes: `POST /` and `POST /webhook` for updates, `GET /health`.
pub fn router(bot: Arc<StrangleBot>) -> Router {
    Router::new()
        .route("/", post(handle_update))
        .route("/webhook", post(handle_update))
        .route("/health", get(health))
        .with_state(bot)
}

/// Bind `0.0.0.0:port` and serve until the task is dropped.
pub async fn serve(bot: Arc<StrangleBot>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Webhook listening on {}", addr);

    axum::serve(listener, router(bot)).await?;

    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

async fn handle_update(
    State(bot): State<Arc<StrangleBot>>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let update: TelegramUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Rejected webhook body");
            return (StatusCode::BAD_REQUEST, "Bad JSON");
        }
    };

    let text = update
        .message
        .or(update.edited_message)
        .and_then(|m| m.text)
        .unwrap_or_default();

    match parse_command(&text) {
        Some(BotCommand::Strangle) => {
            info!("Manual /strangle command received");
            let _ = bot.spawn_trigger(TriggerSource::Manual);
        }
        None => debug!("Ignoring non-command update"),
    }

    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyConfig;
    use crate::exchange::{ExchangeError, MockOptionsExchange};
    use crate::notify::Notifier;
    use crate::strategy::StrangleExecutor;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, _destination: &str, text: &str) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn setup() -> (Router, Arc<RecordingNotifier>) {
        let mut exchange = MockOptionsExchange::new();
        exchange
            .expect_get_ticker()
            .returning(|_| Err(ExchangeError::http(503, "maintenance")));
        let notifier = Arc::new(RecordingNotifier::default());
        let bot = StrangleBot::new(
            Arc::new(exchange),
            StrangleExecutor::new(StrategyConfig::default()),
            notifier.clone(),
            "chat",
        );
        (router(Arc::new(bot)), notifier)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn wait_for_messages(notifier: &RecordingNotifier, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let sent = notifier.sent.lock().unwrap().clone();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        notifier.sent.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_bad_json_is_400() {
        let (app, _) = setup();
        let response = app.oneshot(post_json("/", "not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_command_is_acknowledged_without_run() {
        let (app, notifier) = setup();
        let response = app
            .oneshot(post_json("/", r#"{"message": {"text": "hello"}}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_strangle_command_triggers_manual_run() {
        let (app, notifier) = setup();
        let response = app
            .oneshot(post_json(
                "/webhook",
                r#"{"update_id": 1, "message": {"chat": {"id": 5}, "text": "/strangle"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let sent = wait_for_messages(&notifier, 2).await;
        assert_eq!(sent[0], "Manual trigger received: executing short strangle...");
        assert!(sent[1].starts_with("Error during manual execution"));
    }

    #[tokio::test]
    async fn test_edited_message_is_considered() {
        let (app, notifier) = setup();
        app.oneshot(post_json("/", r#"{"edited_message": {"text": "/Strangle"}}"#))
            .await
            .unwrap();

        let sent = wait_for_messages(&notifier, 1).await;
        assert!(!sent.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = setup();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
