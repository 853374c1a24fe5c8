//! Telegram Bot API notifier.
//!
//! Messages go to a single chat as legacy Markdown with link previews off.
//! The bot token is part of every request URL, so transport errors are
//! stripped of their URL before they are surfaced.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Notifier;
use crate::{config::TelegramConfig, error::AppError};

const TG_API: &str = "https://api.telegram.org/bot";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    username: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    /// `https://api.telegram.org/bot<token>`
    bot_url: String,
    chat_id: i64,
}

impl TelegramNotifier {
    /// Build the notifier and check the bot token with `getMe`.
    pub async fn connect(config: &TelegramConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Http(e.without_url()))?;

        let notifier = Self {
            client,
            bot_url: format!("{TG_API}{}", config.bot_token),
            chat_id: config.chat_id,
        };

        let me: TgResponse<TgUser> = notifier
            .client
            .get(format!("{}/getMe", notifier.bot_url))
            .send()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?
            .json()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;

        let bot = ensure_ok("getMe", me)?;
        tracing::info!(
            bot = bot.username.as_deref().unwrap_or("unknown"),
            chat_id = notifier.chat_id,
            "Telegram bot authorized"
        );

        Ok(notifier)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), AppError> {
        let body = SendMessage {
            chat_id: self.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        };

        let response: TgResponse<serde_json::Value> = self
            .client
            .post(format!("{}/sendMessage", self.bot_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?
            .json()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;

        ensure_ok("sendMessage", response).map(|_| ())
    }
}

fn ensure_ok<T>(method: &str, response: TgResponse<T>) -> Result<T, AppError> {
    match response {
        TgResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        TgResponse { description, .. } => Err(AppError::Telegram(format!(
            "{method} failed: {}",
            description.unwrap_or_else(|| "no description".into())
        ))),
    }
}
