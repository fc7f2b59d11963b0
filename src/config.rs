use std::{fmt, num::NonZeroU64, time::Duration};

use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(600);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const DISCORD_TOKEN: &str = "DISCORD_TOKEN";
pub const DISCORD_CHANNEL_ID: &str = "DISCORD_CHANNEL_ID";
pub const HOMEWORK_ENDPOINT: &str = "HOMEWORK_ENDPOINT";
pub const RETRY_INTERVAL_SECS: &str = "RETRY_INTERVAL_SECS";
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not provided")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Secrets required before the watcher is allowed to start.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub discord_token: String,
    pub channel_id: NonZeroU64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("discord_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub retry_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            retry_interval: DEFAULT_RETRY_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Process-wide configuration, built once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub credentials: Credentials,
    pub settings: Settings,
}

impl Config {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let practicum_token = require(PRACTICUM_TOKEN)?;
        let discord_token = require(DISCORD_TOKEN)?;
        let channel_id = parse_channel_id(&require(DISCORD_CHANNEL_ID)?)?;

        let mut settings = Settings::default();
        if let Some(endpoint) = get(HOMEWORK_ENDPOINT) {
            settings.endpoint = endpoint;
        }
        if let Some(secs) = get(RETRY_INTERVAL_SECS) {
            settings.retry_interval = parse_secs(RETRY_INTERVAL_SECS, &secs)?;
        }
        if let Some(secs) = get(REQUEST_TIMEOUT_SECS) {
            settings.request_timeout = parse_secs(REQUEST_TIMEOUT_SECS, &secs)?;
        }

        Ok(Self {
            credentials: Credentials {
                practicum_token,
                discord_token,
                channel_id,
            },
            settings,
        })
    }
}

fn parse_channel_id(value: &str) -> ConfigResult<NonZeroU64> {
    match value.trim().parse::<u64>().map(NonZeroU64::new) {
        Ok(None) => Err(ConfigError::Invalid {
            name: DISCORD_CHANNEL_ID,
            value: value.to_owned(),
            reason: "channel id must be non-zero",
        }),
        Ok(Some(id)) => Ok(id),
        Err(_) => Err(ConfigError::Invalid {
            name: DISCORD_CHANNEL_ID,
            value: value.to_owned(),
            reason: "expected a numeric channel id",
        }),
    }
}

fn parse_secs(name: &'static str, value: &str) -> ConfigResult<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_owned(),
            reason: "expected a positive number of seconds",
        }),
    }
}
