//! Startup configuration read from environment variables (and `.env`).
//!
//! Every value is read once; the resulting [`Config`] is immutable for the
//! lifetime of the process.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use pool_events::Token;

use crate::{
    error::AppError,
    handlers::{Links, PipelineConfig},
};

mod defaults {
    pub const TRANSPORT_RECONNECT_WAIT_SECS: u64 = 10;
    pub const TRANSPORT_MAX_RECONNECTS: u32 = 500;
    pub const EXPLORER_URL: &str = "https://etherscan.io";
    pub const POOL_INFO_URL: &str = "https://v2.info.uniswap.org/pair";
    pub const DEX_NAME: &str = "Uniswap";
}

/// Pub/sub connection settings
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Tried in order until one accepts the connection
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub password: String,
    pub subject: String,
    pub reconnect_wait: Duration,
    pub max_reconnects: u32,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub transport: TransportConfig,
    pub telegram: TelegramConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from the process environment, after applying a
    /// `.env` file if one is present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let urls = vars
            .required("TRANSPORT_URLS")?
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();
        if urls.is_empty() {
            return Err(AppError::MissingEnvVar("TRANSPORT_URLS".into()));
        }

        let transport = TransportConfig {
            urls,
            username: vars.optional("TRANSPORT_USERNAME"),
            password: vars.required("TRANSPORT_PASSWORD")?,
            subject: vars.required("EVENT_LOG_SUBJECT")?,
            reconnect_wait: Duration::from_secs(vars.parsed_or(
                "TRANSPORT_RECONNECT_WAIT_SECS",
                defaults::TRANSPORT_RECONNECT_WAIT_SECS,
            )?),
            max_reconnects: vars
                .parsed_or("TRANSPORT_MAX_RECONNECTS", defaults::TRANSPORT_MAX_RECONNECTS)?,
        };

        let chat_id = vars.parsed::<i64>("TELEGRAM_CHAT_ID")?;
        if chat_id == 0 {
            return Err(AppError::InvalidEnvVar {
                name: "TELEGRAM_CHAT_ID".into(),
                reason: "chat id must be non-zero".into(),
            });
        }

        let telegram = TelegramConfig {
            bot_token: vars.required("TELEGRAM_BOT_TOKEN")?,
            chat_id,
        };

        let pipeline = PipelineConfig {
            contract_address: vars.required("POOL_CONTRACT_ADDRESS")?,
            token0: vars.token("POOL_TOKEN0_TICKER", "POOL_TOKEN0_DECIMALS")?,
            token1: vars.token("POOL_TOKEN1_TICKER", "POOL_TOKEN1_DECIMALS")?,
            links: Links {
                explorer_url: vars.url_or("EXPLORER_URL", defaults::EXPLORER_URL),
                pool_info_url: vars.url_or("POOL_INFO_URL", defaults::POOL_INFO_URL),
                dex_name: vars
                    .optional("DEX_NAME")
                    .unwrap_or_else(|| defaults::DEX_NAME.to_string()),
            },
        };

        Ok(Self {
            transport,
            telegram,
            pipeline,
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, AppError> {
        self.optional(name)
            .ok_or_else(|| AppError::MissingEnvVar(name.into()))
    }

    fn parsed<T>(&self, name: &str) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.required(name)?;
        parse_var(name, &raw)
    }

    fn parsed_or<T>(&self, name: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(name) {
            Some(raw) => parse_var(name, &raw),
            None => Ok(default),
        }
    }

    fn url_or(&self, name: &str, default: &str) -> String {
        self.optional(name)
            .unwrap_or_else(|| default.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    fn token(&self, ticker_var: &str, decimals_var: &str) -> Result<Token, AppError> {
        let ticker = self.required(ticker_var)?;
        let decimals = self.parsed::<u8>(decimals_var)?;

        Token::new(ticker, decimals).map_err(|err| AppError::InvalidEnvVar {
            name: decimals_var.into(),
            reason: err.to_string(),
        })
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(|err| AppError::InvalidEnvVar {
        name: name.into(),
        reason: format!("`{raw}`: {err}"),
    })
}
