//! Application configuration loaded from environment variables.

use crate::errors::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the burger REST API (no trailing slash)
    pub api_url: String,
    /// Path to the SQLite database holding session credentials
    pub database_url: String,
    /// Port for the read-only state inspector
    pub inspector_port: u16,
    /// How often (in seconds) to refresh the live order feed
    pub feed_poll_interval_secs: u64,
    /// Timeout applied to every API request
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            api_url: var("API_URL", "https://norma.nomoreparties.space/api")
                .trim_end_matches('/')
                .to_string(),
            database_url: var("DATABASE_URL", "sqlite:./burger_session.db"),
            inspector_port: var("INSPECTOR_PORT", "3001")
                .parse()
                .map_err(|_| ClientError::Config("Invalid INSPECTOR_PORT".to_string()))?,
            feed_poll_interval_secs: var("FEED_POLL_INTERVAL_SECS", "15")
                .parse()
                .map_err(|_| ClientError::Config("Invalid FEED_POLL_INTERVAL_SECS".to_string()))?,
            http_timeout_secs: var("HTTP_TIMEOUT_SECS", "30")
                .parse()
                .map_err(|_| ClientError::Config("Invalid HTTP_TIMEOUT_SECS".to_string()))?,
        })
    }
}
