use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use renthawk_core::config::NotifierConfig;
use renthawk_notifier::cli::Cli;
use renthawk_notifier::delivery::DeliveryWorker;
use renthawk_notifier::transport::TelegramTransport;
use renthawk_notifier::{commands, transport::ChatTransport};
use renthawk_store::DuckDbBackend;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let mut config = NotifierConfig::from_env().context("loading notifier configuration")?;
    if let Some(interval) = cli.interval {
        config.notification_interval_seconds = interval.clamp(5, 3600);
    }

    let store = DuckDbBackend::open(&config.db_path).context("opening renthawk store")?;
    let transport: Arc<dyn ChatTransport> = Arc::new(TelegramTransport::new(&config.bot_token));
    let worker = DeliveryWorker::new(store.clone(), transport, config.clone());

    if cli.once {
        worker.run_once().await.context("running delivery pass")?;
        return Ok(());
    }

    let (tx, rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received shutdown signal");
            let _ = tx.send(true);
        }
    });

    if cli.skip_commands {
        worker.run(rx).await
    } else {
        let bot = teloxide::Bot::new(&config.bot_token);
        let command_store = store.clone();
        let commands_task = tokio::spawn(async move { commands::run(bot, command_store).await });
        let result = worker.run(rx).await;
        commands_task.abort();
        result
    }
}
