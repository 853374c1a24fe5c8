//! Redis pub/sub transport for inbound log events.
//!
//! Handlers are registered per subject (channel) before serving. Serving
//! connects to the first reachable URL, subscribes to every registered
//! subject and dispatches payloads until cancelled, reconnecting whenever
//! the subscription drops.

use std::{collections::HashMap, pin::pin, sync::Arc};

use async_trait::async_trait;
use futures::StreamExt;
use redis::{aio::PubSub, Client, IntoConnectionInfo};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{config::TransportConfig, error::AppError};

/// Receives the raw payload of every message on a subscribed subject
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: &[u8]) -> Result<(), AppError>;
}

/// Long-running message source driven by the supervisor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Serve until `cancel` fires (returns `Ok`) or the transport gives up
    async fn serve(&self, cancel: CancellationToken) -> Result<(), AppError>;
}

enum StreamEnd {
    Cancelled,
    Disconnected,
}

pub struct RedisSubscriber {
    config: TransportConfig,
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl RedisSubscriber {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            handlers: HashMap::new(),
        }
    }

    pub fn add_handler(&mut self, subject: impl Into<String>, handler: Arc<dyn MessageHandler>) {
        self.handlers.insert(subject.into(), handler);
    }

    /// Open and subscribe once, so an unreachable transport or rejected
    /// credentials fail startup instead of the first serve attempt.
    pub async fn check_connection(&self) -> Result<(), AppError> {
        let (url, _) = self.subscribe().await?;
        tracing::info!(url, "Service connected to transport");
        Ok(())
    }

    fn client_for(&self, url: &str) -> Result<Client, AppError> {
        let mut info = url.into_connection_info()?;
        info.redis.password = Some(self.config.password.clone());
        if let Some(username) = &self.config.username {
            info.redis.username = Some(username.clone());
        }

        Ok(Client::open(info)?)
    }

    async fn subscribe_url(&self, url: &str) -> Result<PubSub, AppError> {
        let mut pubsub = self.client_for(url)?.get_async_pubsub().await?;
        for subject in self.handlers.keys() {
            pubsub.subscribe(subject).await?;
        }
        Ok(pubsub)
    }

    /// Try each configured URL in order
    async fn subscribe(&self) -> Result<(&str, PubSub), AppError> {
        let mut last_error = None;

        for url in &self.config.urls {
            match self.subscribe_url(url).await {
                Ok(pubsub) => return Ok((url.as_str(), pubsub)),
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "Transport connection failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::TransportConnection("no transport URLs configured".into())))
    }

    async fn consume(&self, pubsub: &mut PubSub, cancel: &CancellationToken) -> StreamEnd {
        let mut messages = pin!(pubsub.on_message());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return StreamEnd::Cancelled,
                next = messages.next() => match next {
                    Some(message) => {
                        self.dispatch(message.get_channel_name(), message.get_payload_bytes())
                            .await
                    }
                    None => return StreamEnd::Disconnected,
                },
            }
        }
    }

    /// Handler errors are logged and the message dropped
    async fn dispatch(&self, subject: &str, payload: &[u8]) {
        let Some(handler) = self.handlers.get(subject) else {
            tracing::debug!(subject, "No handler for subject");
            return;
        };

        if let Err(err) = handler.handle(payload).await {
            tracing::warn!(subject, error = %err, "Dropping message");
        }
    }
}

#[async_trait]
impl Transport for RedisSubscriber {
    async fn serve(&self, cancel: CancellationToken) -> Result<(), AppError> {
        let mut failures = 0u32;

        loop {
            let attempt = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                attempt = self.subscribe() => attempt,
            };

            match attempt {
                Ok((url, mut pubsub)) => {
                    failures = 0;
                    tracing::info!(url, subjects = ?self.handlers.keys().collect::<Vec<_>>(), "Subscribed");

                    match self.consume(&mut pubsub, &cancel).await {
                        StreamEnd::Cancelled => return Ok(()),
                        StreamEnd::Disconnected => {
                            tracing::warn!(url, "Subscription stream ended, reconnecting")
                        }
                    }
                }
                Err(err) => {
                    failures += 1;
                    if failures > self.config.max_reconnects {
                        return Err(AppError::MaxReconnectsExceeded(self.config.max_reconnects));
                    }
                    tracing::warn!(
                        error = %err,
                        attempt = failures,
                        max_reconnects = self.config.max_reconnects,
                        "Reconnecting to transport"
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = sleep(self.config.reconnect_wait) => {}
            }
        }
    }
}
