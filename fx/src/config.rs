//! Rate resolution configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Where the euro reference-rate documents are published.
pub const DEFAULT_FEED_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/";

/// What to do with a date that has no rate for the requested base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingBasePolicy {
    /// Drop the date and keep going.
    #[default]
    Skip,
    /// Fail the whole load.
    Fail,
}

impl FromStr for MissingBasePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MissingBasePolicy::Skip),
            "fail" => Ok(MissingBasePolicy::Fail),
            other => Err(format!("unknown missing-base policy '{}'", other)),
        }
    }
}

/// Configuration for loading rate series.
#[derive(Debug, Clone)]
pub struct FxConfig {
    /// Base URL the three feed documents live under.
    pub feed_base_url: String,
    /// Directory holding cached feed documents.
    pub cache_dir: PathBuf,
    /// Cached documents younger than this are reused.
    pub freshness: Duration,
    /// HTTP request timeout.
    pub request_timeout: Duration,
    /// User agent sent with feed requests.
    pub user_agent: String,
    /// Handling of dates without a base-currency rate.
    pub missing_base: MissingBasePolicy,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            feed_base_url: DEFAULT_FEED_URL.to_string(),
            cache_dir: PathBuf::from("cache"),
            freshness: Duration::from_secs(8 * 60 * 60),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("refrates/", env!("CARGO_PKG_VERSION")).to_string(),
            missing_base: MissingBasePolicy::Skip,
        }
    }
}

impl FxConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("REFRATES_FEED_URL") {
            config.feed_base_url = url;
        }

        if let Ok(dir) = std::env::var("REFRATES_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }

        if let Ok(secs) = std::env::var("REFRATES_CACHE_TTL_SECS") {
            if let Ok(secs) = secs.parse() {
                config.freshness = Duration::from_secs(secs);
            }
        }

        if let Ok(secs) = std::env::var("REFRATES_HTTP_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(policy) = std::env::var("REFRATES_MISSING_BASE") {
            if let Ok(policy) = policy.parse() {
                config.missing_base = policy;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.feed_base_url.trim().is_empty() {
            return Err("Feed base URL cannot be empty".to_string());
        }

        if self.freshness.is_zero() {
            return Err("Cache freshness cannot be zero".to_string());
        }

        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        Ok(())
    }
}
