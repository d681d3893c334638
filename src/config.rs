use crate::mode::Mode;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL; endpoint paths are appended to it.
    pub api_url: String,
    /// Per-request timeout handed to the transport.
    pub request_timeout_secs: u64,
    /// Mode the process starts in.
    pub initial_mode: Mode,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// - `ANALYST_API_URL`: backend base URL (default `http://localhost:8000`)
    /// - `ANALYST_TIMEOUT_SECS`: request timeout (default `60`)
    /// - `ANALYST_MODE`: `manual` or `autonomous` (default `autonomous`)
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_url: env::var("ANALYST_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            request_timeout_secs: env::var("ANALYST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
            initial_mode: env::var("ANALYST_MODE")
                .map(|m| Mode::parse(&m))
                .unwrap_or_default(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
