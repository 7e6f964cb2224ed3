//! Configuration for the storefront front end.
//!
//! Values resolve CLI argument → environment variable → hardcoded default;
//! `.env` files are loaded by the binary before parsing.

use std::time::Duration;
use url::Url;

/// Resolved front-end configuration.
#[derive(Debug, Clone)]
pub struct Config {
    ledger_url: Url,
    request_timeout: Duration,
    settle_timeout: Option<Duration>,
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ledger URL {0}: {1}")]
    InvalidLedgerUrl(String, url::ParseError),
}

pub mod config_defaults {
    use std::env;

    pub const DEFAULT_LEDGER_URL: &str = "http://127.0.0.1:8080";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_SETTLE_TIMEOUT_SECS: u64 = 60;

    /// Returns the default ledger URL with fallback: $LEDGER_URL env var ->
    /// local default.
    pub fn default_ledger_url() -> String {
        env::var("LEDGER_URL").unwrap_or_else(|_| DEFAULT_LEDGER_URL.to_string())
    }

    /// Returns the default per-request timeout with fallback:
    /// $REQUEST_TIMEOUT_SECS env var -> 10.
    pub fn default_request_timeout_secs() -> u64 {
        env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Returns the default settlement deadline with fallback:
    /// $SETTLE_TIMEOUT_SECS env var -> 60. Zero disables the deadline.
    pub fn default_settle_timeout_secs() -> u64 {
        env::var("SETTLE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SETTLE_TIMEOUT_SECS)
    }
}

impl Config {
    /// Builds a config from raw values, typically clap output.
    ///
    /// A `settle_timeout_secs` of zero disables the settlement deadline;
    /// the flow then waits on the adapter indefinitely.
    pub fn new(
        ledger_url: &str,
        request_timeout_secs: u64,
        settle_timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let url = Url::parse(ledger_url)
            .map_err(|e| ConfigError::InvalidLedgerUrl(ledger_url.to_string(), e))?;
        let settle_timeout = if settle_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(settle_timeout_secs))
        };
        Ok(Self {
            ledger_url: url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            settle_timeout,
        })
    }

    pub fn ledger_url(&self) -> &Url {
        &self.ledger_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Settlement deadline; `None` waits on the adapter indefinitely.
    pub fn settle_timeout(&self) -> Option<Duration> {
        self.settle_timeout
    }
}
