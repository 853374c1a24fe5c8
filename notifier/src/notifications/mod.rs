//! Outbound notification channel.

pub mod telegram;

use async_trait::async_trait;

use crate::error::AppError;

/// Delivers a rendered notification to its configured destination.
///
/// Implementations must be safe to call from concurrent pipeline
/// invocations.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), AppError>;
}
