use crate::error::{AppError, Result};

pub const TRADIER_API_URL: &str = "https://api.tradier.com/v1";

/// Per-request timeout for Tradier REST calls (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// One option contract covers this many shares of the underlying.
pub const SHARES_PER_CONTRACT: u32 = 100;

/// Annualization basis for yield comparison across expirations.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Default number of expiration dates a single /analyze call fetches chains
/// for. Near-dated expirations come first in the Tradier listing, so the cap
/// keeps the interesting ones.
pub const DEFAULT_ANALYZE_MAX_EXPIRATIONS: usize = 8;

/// Hard ceiling on expirations per analyze call. Bounds both the configured
/// default and the per-request `expirations` override.
pub const ANALYZE_EXPIRATIONS_CEILING: usize = 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub tradier_api_url: String,
    /// Bearer token for the Tradier API (TRADIER_API_KEY, required).
    pub tradier_api_key: String,
    pub log_level: String,
    pub api_port: u16,
    /// Default chain-fetch cap per analyze call (ANALYZE_MAX_EXPIRATIONS).
    pub analyze_max_expirations: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            tradier_api_url: std::env::var("TRADIER_API_URL")
                .unwrap_or_else(|_| TRADIER_API_URL.to_string()),
            tradier_api_key: std::env::var("TRADIER_API_KEY")
                .map_err(|_| AppError::Config("TRADIER_API_KEY must be set".to_string()))?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            analyze_max_expirations: std::env::var("ANALYZE_MAX_EXPIRATIONS")
                .unwrap_or_else(|_| DEFAULT_ANALYZE_MAX_EXPIRATIONS.to_string())
                .parse::<usize>()
                .unwrap_or(DEFAULT_ANALYZE_MAX_EXPIRATIONS)
                .clamp(1, ANALYZE_EXPIRATIONS_CEILING),
        })
    }
}
