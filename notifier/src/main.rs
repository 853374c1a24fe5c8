//! Pool swap notifier
//!
//! Subscribes to contract log events, picks out Swap events of one pool and
//! posts a Telegram message for each trade.

use std::{error::Error, sync::Arc};

use config::Config;
use notifications::telegram::TelegramNotifier;
use service::SwapPipeline;
use subscriber::RedisSubscriber;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod events;
mod handlers;
mod message;
mod notifications;
mod service;
mod subscriber;
mod supervisor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swap_notifier=info,pool_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        pool = %config.pipeline.contract_address,
        pair = %config.pipeline.pool_pair(),
        subject = %config.transport.subject,
        "Starting swap notifier"
    );

    let notifier = TelegramNotifier::connect(&config.telegram).await?;
    let pipeline = Arc::new(SwapPipeline::new(config.pipeline, Arc::new(notifier)));

    let mut subscriber = RedisSubscriber::new(config.transport.clone());
    subscriber.add_handler(config.transport.subject, pipeline);
    subscriber.check_connection().await?;

    let root = CancellationToken::new();
    supervisor::run(Arc::new(subscriber), &root, supervisor::shutdown_signal()).await?;

    Ok(())
}
