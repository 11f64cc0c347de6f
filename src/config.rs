use reqwest::Url;
use std::{env, time::Duration};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_NOTICE_HIDE_MS: u64 = 5_000;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("BACKEND_URL is not a usable base url: {0:?}")]
    InvalidBackendUrl(String),

    #[error("NOTICE_HIDE_MS must be a number of milliseconds, got {0:?}")]
    InvalidNoticeDuration(String),

    #[error("REFRESH_CONTROL must be true or false, got {0:?}")]
    InvalidFlag(String),

    #[error("SESSION_IDLE_SECS must be a positive number of seconds, got {0:?}")]
    InvalidSessionIdle(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: Url,
    /// How long a notice stays visible after a submission settles.
    pub notice_hide_after: Duration,
    /// Whether the page renders the `refresh-customers` control.
    pub refresh_control: bool,
    /// How long a browser's page state is kept without a request.
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        let backend_url = parse_backend_url(
            &lookup("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        )?;

        let notice_hide_after = match lookup("NOTICE_HIDE_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidNoticeDuration(value))?,
            None => Duration::from_millis(DEFAULT_NOTICE_HIDE_MS),
        };

        let refresh_control = match lookup("REFRESH_CONTROL") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::InvalidFlag(value)),
            },
            None => true,
        };

        let session_idle = match lookup("SESSION_IDLE_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidSessionIdle(value)),
            },
            None => Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        };

        Ok(Self {
            port,
            backend_url,
            notice_hide_after,
            refresh_control,
            session_idle,
        })
    }
}

pub fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidBackendUrl(raw.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBackendUrl(raw.to_string()));
    }
    Ok(url)
}
