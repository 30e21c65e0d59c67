//! Strangle Bot - Main Entry Point
//!
//! Runs the daily scheduler and the Telegram webhook side by side, or a single
//! cycle from the command line.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use strangle_bot::bot::{StrangleBot, TriggerOutcome, TriggerSource};
use strangle_bot::config::{Config, TradingMode};
use strangle_bot::exchange::{DeltaClient, OptionsExchange, PaperExchange};
use strangle_bot::notify::TelegramNotifier;
use strangle_bot::scheduler::DailySchedule;
use strangle_bot::server;
use strangle_bot::strategy::StrangleExecutor;
use tracing::{error, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Strangle Bot CLI
#[derive(Parser)]
#[command(name = "strangle-bot")]
#[command(version, about = "Same-day BTC short strangle on Delta Exchange India")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Simulate orders locally instead of sending them
    #[arg(long, global = true)]
    paper: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daily scheduler and webhook listener (default)
    Serve,

    /// Execute one strangle cycle now and exit
    RunOnce {
        /// Also send the trigger notice and report to Telegram
        #[arg(long)]
        notify: bool,
    },

    /// Print the next scheduled fire time and exit
    NextRun,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.log_json)?;

    let mut config = Config::load()?;
    if cli.paper {
        config.trading_mode = TradingMode::Paper;
    }

    let command = cli.command.unwrap_or(Commands::Serve);

    if let Commands::NextRun = command {
        let schedule = DailySchedule::new(config.schedule.time()?);
        let next = schedule.next_fire_after(Utc::now());
        println!("{}", next.to_rfc3339());
        return Ok(());
    }

    if let Err(e) = config.validate() {
        error!("❌ Invalid configuration: {:#}", e);
        return Err(e);
    }

    info!("╔════════════════════════════════════════════════════════════╗");
    info!(
        "║            Strangle Bot v{} - Delta Exchange              ║",
        env!("CARGO_PKG_VERSION")
    );
    info!("╚════════════════════════════════════════════════════════════╝");
    log_config(&config);

    let exchange = build_exchange(&config)?;
    let executor = StrangleExecutor::new(config.strategy.clone());

    match command {
        Commands::RunOnce { notify: false } => {
            let underlying = config.strategy.underlying_symbol.clone();
            match executor.execute(exchange.as_ref(), &underlying).await {
                Ok(report) => {
                    println!("{}", report);
                    Ok(())
                }
                Err(e) => {
                    error!("❌ Strangle run failed: {}", e);
                    Err(e.into())
                }
            }
        }
        Commands::RunOnce { notify: true } => {
            let bot = build_bot(&config, exchange, executor)?;
            match bot.trigger(TriggerSource::Manual).await {
                TriggerOutcome::Completed(_) => Ok(()),
                TriggerOutcome::Failed(e) => Err(e.into()),
                TriggerOutcome::Rejected => anyhow::bail!("run rejected"),
            }
        }
        Commands::Serve | Commands::NextRun => {
            let bot = Arc::new(build_bot(&config, exchange, executor)?);
            serve(&config, bot).await
        }
    }
}

fn build_exchange(config: &Config) -> Result<Arc<dyn OptionsExchange>> {
    let client: Arc<dyn OptionsExchange> = Arc::new(DeltaClient::new(&config.delta)?);

    Ok(match config.trading_mode {
        TradingMode::Live => {
            warn!("⚠️  LIVE TRADING MODE - Real orders will be placed!");
            client
        }
        TradingMode::Paper => {
            info!("📝 PAPER TRADING MODE - Orders are simulated locally");
            Arc::new(PaperExchange::new(client))
        }
    })
}

fn build_bot(
    config: &Config,
    exchange: Arc<dyn OptionsExchange>,
    executor: StrangleExecutor,
) -> Result<StrangleBot> {
    let notifier = Arc::new(TelegramNotifier::new(&config.telegram)?);
    Ok(StrangleBot::new(
        exchange,
        executor,
        notifier,
        config.telegram.chat_id.clone(),
    ))
}

/// Scheduler and webhook until Ctrl-C or the listener fails.
///
/// Runs execute on their own tasks; shutdown waits for the one in flight so
/// entries are never left without their stops.
async fn serve(config: &Config, bot: Arc<StrangleBot>) -> Result<()> {
    let schedule = DailySchedule::new(config.schedule.time()?);

    let scheduled_bot = bot.clone();
    let scheduler = schedule.run(move || {
        let handle = scheduled_bot.spawn_trigger(TriggerSource::Scheduled);
        async move {
            if let Err(e) = handle.await {
                error!("❌ Scheduled run task failed: {}", e);
            }
        }
    });

    info!("🚀 Strangle bot started");

    let result = tokio::select! {
        _ = scheduler => Ok(()),
        result = server::serve(bot.clone(), config.server.port) => {
            if let Err(e) = &result {
                error!("❌ Webhook listener stopped: {:#}", e);
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Shutdown signal received");
            Ok(())
        }
    };

    bot.shutdown().await;
    info!("👋 Strangle bot shutdown complete");
    result
}

/// Initialize logging to stdout and a daily rolling file.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_logging(json: bool) -> Result<WorkerGuard> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    std::fs::create_dir_all("logs")?;

    let file_appender = tracing_appender::rolling::daily("logs", "strangle-bot.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::from_default_env()
        .add_directive("strangle_bot=debug".parse()?)
        .add_directive(Level::INFO.into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout.and(file_writer))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(true).init();
    }

    Ok(guard)
}

/// Log configuration on startup.
fn log_config(config: &Config) {
    info!("📋 Configuration:");
    info!("   Mode: {:?}", config.trading_mode);
    info!("   Exchange: {}", config.delta.base_url);
    info!(
        "   Underlying: {} / options on {}",
        config.strategy.underlying_symbol, config.strategy.option_asset
    );
    info!(
        "   Strike offset: {}, Size: {} lot(s), Stop: {}x premium",
        config.strategy.strike_offset,
        config.strategy.order_size,
        config.strategy.stop_loss_multiplier
    );
    info!("   Daily run: {} UTC", config.schedule.daily_at_utc);
    info!("   Webhook port: {}", config.server.port);
}
