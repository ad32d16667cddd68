//! Terminal configuration.

use std::time::Duration;

/// Runtime configuration loaded from environment variables.
///
/// All fields except the backend URL have defaults suitable for a
/// standard pórtico terminal.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Base URL of the access-log backend.
    pub backend_url: String,
    /// Feedback region name for this screen (default: `portico`).
    pub region: String,
    /// Log board auto-refresh interval (default: `10` seconds).
    pub log_refresh: Duration,
    /// Control flag polling interval (default: `3` seconds).
    pub toggle_poll: Duration,
    /// Feedback card dwell before fade-out (default: `5000` ms).
    pub feedback_dwell: Duration,
    /// Fade transition duration (default: `500` ms).
    pub feedback_fade: Duration,
    /// Outbound HTTP request timeout (default: `30` seconds).
    pub request_timeout: Duration,
}

impl TerminalConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Required | Default   |
    /// |------------------------|----------|-----------|
    /// | `BACKEND_URL`          | yes      | --        |
    /// | `PORTICO_REGION`       | no       | `portico` |
    /// | `LOG_REFRESH_SECS`     | no       | `10`      |
    /// | `TOGGLE_POLL_SECS`     | no       | `3`       |
    /// | `FEEDBACK_DWELL_MS`    | no       | `5000`    |
    /// | `FEEDBACK_FADE_MS`     | no       | `500`     |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `30`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url =
            std::env::var("BACKEND_URL").map_err(|_| ConfigError::Missing("BACKEND_URL"))?;

        Ok(Self {
            backend_url,
            region: std::env::var("PORTICO_REGION").unwrap_or_else(|_| "portico".into()),
            log_refresh: Duration::from_secs(env_u64("LOG_REFRESH_SECS", 10)?),
            toggle_poll: Duration::from_secs(env_u64("TOGGLE_POLL_SECS", 3)?),
            feedback_dwell: Duration::from_millis(env_u64("FEEDBACK_DWELL_MS", 5000)?),
            feedback_fade: Duration::from_millis(env_u64("FEEDBACK_FADE_MS", 500)?),
            request_timeout: Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{0} must be a valid integer")]
    Invalid(&'static str),
}

fn env_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}
