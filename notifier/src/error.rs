use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing `{0}` environment variable")]
    MissingEnvVar(String),

    #[error("Invalid `{name}` environment variable: {reason}")]
    InvalidEnvVar { name: String, reason: String },

    #[error("Malformed log event: {0}")]
    MalformedLogEvent(#[from] serde_json::Error),

    #[error("Event decode error: {0}")]
    EventDecode(String),

    #[error("Invalid topic `{0}`")]
    InvalidTopic(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport connection error: {0}")]
    TransportConnection(String),

    #[error("Max reconnects ({0}) exceeded")]
    MaxReconnectsExceeded(u32),

    #[error("Supervised task panicked: {0}")]
    TaskPanicked(String),

    #[error("Cancelled")]
    Cancelled,
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::TransportConnection(err.to_string())
    }
}
