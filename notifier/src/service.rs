use std::sync::Arc;

use async_trait::async_trait;
use pool_events::IncomingLogEvent;

use crate::{
    error::AppError,
    events::{self, EventKind},
    handlers::{swap, PipelineConfig},
    message,
    notifications::Notifier,
    subscriber::MessageHandler,
};

/// Why an event produced no notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Emitted by a contract other than the monitored pool
    ForeignContract,
    UnrecognizedEvent,
    DecodeFailed,
    /// Both "in" amounts were zero
    IndeterminateDirection,
    MissingAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Notified,
    /// Rendered but the notifier rejected it; not retried
    DeliveryFailed,
    Skipped(SkipReason),
}

/// Per-message swap pipeline: filter, classify, decode, resolve, format, send.
///
/// Holds no mutable state, so one instance can serve concurrent deliveries.
pub struct SwapPipeline {
    config: Arc<PipelineConfig>,
    notifier: Arc<dyn Notifier>,
}

impl SwapPipeline {
    pub fn new(config: PipelineConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config: Arc::new(config),
            notifier,
        }
    }

    /// Process one transport payload.
    ///
    /// Only a payload that is not a log event at all is an error; every
    /// per-event failure after parsing is logged and reported as an outcome.
    pub async fn process_log_event(&self, payload: &[u8]) -> Result<Outcome, AppError> {
        let event = IncomingLogEvent::from_slice(payload)?;
        Ok(self.process(&event).await)
    }

    async fn process(&self, event: &IncomingLogEvent) -> Outcome {
        if event.address != self.config.contract_address {
            tracing::trace!(address = %event.address, "Skipping event from another contract");
            return Outcome::Skipped(SkipReason::ForeignContract);
        }

        match events::classify(event) {
            EventKind::Swap => self.process_swap(event).await,
            EventKind::Unknown => {
                tracing::debug!(
                    tx_hash = %event.transaction_hash,
                    topic0 = event.topic(0).unwrap_or_default(),
                    "Skipping unrecognized event"
                );
                Outcome::Skipped(SkipReason::UnrecognizedEvent)
            }
        }
    }

    async fn process_swap(&self, event: &IncomingLogEvent) -> Outcome {
        let payload = match events::swap::decode(event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(
                    tx_hash = %event.transaction_hash,
                    data = %event.data,
                    error = %err,
                    "Failed to decode Swap event"
                );
                return Outcome::Skipped(SkipReason::DecodeFailed);
            }
        };

        let resolved = match swap::resolve(&self.config, event, &payload) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                tracing::warn!(
                    tx_hash = %event.transaction_hash,
                    ?payload,
                    "Skipping Swap with no input amounts"
                );
                return Outcome::Skipped(SkipReason::IndeterminateDirection);
            }
            Err(err) => {
                tracing::warn!(
                    tx_hash = %event.transaction_hash,
                    error = %err,
                    "Skipping Swap without a trading account"
                );
                return Outcome::Skipped(SkipReason::MissingAccount);
            }
        };

        let text = message::format_swap_message(&self.config, &resolved, &event.transaction_hash);

        match self.notifier.send(&text).await {
            Ok(()) => {
                tracing::info!(tx_hash = %event.transaction_hash, "{text}");
                Outcome::Notified
            }
            Err(err) => {
                tracing::warn!(
                    tx_hash = %event.transaction_hash,
                    error = %err,
                    "Failed to send notification"
                );
                Outcome::DeliveryFailed
            }
        }
    }
}

#[async_trait]
impl MessageHandler for SwapPipeline {
    async fn handle(&self, payload: &[u8]) -> Result<(), AppError> {
        self.process_log_event(payload).await.map(|_| ())
    }
}
