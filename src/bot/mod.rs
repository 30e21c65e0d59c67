//! Trigger handling shared by the scheduler, the webhook and the CLI.
//!
//! Every trigger funnels through [`StrangleBot::trigger`], which owns the
//! single-run lock and forwards the outcome to the operator.

mod command;

pub use command::{parse_command, BotCommand};

use crate::exchange::OptionsExchange;
use crate::notify::{escape_html, Notifier};
use crate::strategy::{ExecutionReport, StrangleError, StrangleExecutor};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// What started a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Scheduled,
    Manual,
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerSource::Scheduled => write!(f, "scheduled"),
            TriggerSource::Manual => write!(f, "manual"),
        }
    }
}

/// Result of a trigger as seen by the caller.
#[derive(Debug)]
pub enum TriggerOutcome {
    Completed(ExecutionReport),
    Failed(StrangleError),
    /// Another run held the lock, or the bot is shutting down; nothing was executed.
    Rejected,
}

/// Runs strangles on demand and reports to a single chat.
pub struct StrangleBot {
    exchange: Arc<dyn OptionsExchange>,
    executor: StrangleExecutor,
    notifier: Arc<dyn Notifier>,
    chat_id: String,
    run_lock: Mutex<()>,
    closed: AtomicBool,
}

impl StrangleBot {
    pub fn new(
        exchange: Arc<dyn OptionsExchange>,
        executor: StrangleExecutor,
        notifier: Arc<dyn Notifier>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            exchange,
            executor,
            notifier,
            chat_id: chat_id.into(),
            run_lock: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    /// Run a trigger on its own task.
    ///
    /// Dropping the handle (or the caller's future) does not cancel the run.
    pub fn spawn_trigger(self: &Arc<Self>, source: TriggerSource) -> JoinHandle<TriggerOutcome> {
        let bot = Arc::clone(self);
        tokio::spawn(async move { bot.trigger(source).await })
    }

    /// Stop accepting triggers and wait for the run in flight, if any.
    ///
    /// Once this returns no order placement is in progress or can start.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if self.is_running() {
            info!("Waiting for the strangle run in flight to finish");
        }
        let _guard = self.run_lock.lock().await;
    }

    /// Whether a run currently holds the lock.
    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    /// Run one strangle cycle unless one is already in progress.
    ///
    /// Never fails: the report or the error text is sent to the operator.
    pub async fn trigger(&self, source: TriggerSource) -> TriggerOutcome {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!(%source, "Run already in progress, trigger rejected");
            self.notify(&format!(
                "A strangle run is already in progress; {} trigger ignored.",
                source
            ))
            .await;
            return TriggerOutcome::Rejected;
        };

        if self.closed.load(Ordering::SeqCst) {
            warn!(%source, "Shutting down, trigger dropped");
            return TriggerOutcome::Rejected;
        }

        let asset = &self.executor.config().option_asset;
        let notice = match source {
            TriggerSource::Scheduled => format!(
                "Scheduled run: executing {} short strangle for same-day expiry.",
                asset
            ),
            TriggerSource::Manual => {
                "Manual trigger received: executing short strangle...".to_string()
            }
        };
        self.notify(&notice).await;

        let underlying = &self.executor.config().underlying_symbol;
        info!(%source, %underlying, "Strangle run started");

        match self.executor.execute(self.exchange.as_ref(), underlying).await {
            Ok(report) => {
                info!(%source, expiry = %report.expiry, "Strangle run completed");
                self.notify(&report.to_string()).await;
                TriggerOutcome::Completed(report)
            }
            Err(e) => {
                error!(%source, error = %e, "Strangle run failed");
                let reason = escape_html(&e.to_string());
                let text = match source {
                    TriggerSource::Scheduled => format!("Scheduled run failed: {}", reason),
                    TriggerSource::Manual => format!("Error during manual execution: {}", reason),
                };
                self.notify(&text).await;
                TriggerOutcome::Failed(e)
            }
        }
    }

    /// Best-effort delivery; failures are logged and swallowed.
    async fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.send(&self.chat_id, text).await {
            warn!(error = %e, "Failed to deliver notification");
        }
    }
}
