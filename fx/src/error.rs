//! FX rate resolution error types.

use chrono::NaiveDate;
use refrates_common::{CommonError, Currency};
use thiserror::Error;

/// Errors that can occur while resolving rate series.
#[derive(Debug, Error)]
pub enum FxError {
    /// Remote feed unreachable (or answered with an error) and nothing was cached.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Feed document is malformed or does not match the expected schema.
    #[error("Failed to parse feed document: {0}")]
    Parse(String),

    /// Requested base currency has no rate on a given date.
    #[error("No {base} rate published for {date}")]
    MissingBaseRate { base: Currency, date: NaiveDate },

    /// Cache backend failed to read or write.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Rates were requested before any successful load.
    #[error("No rates loaded")]
    NotLoaded,

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied an invalid date or currency.
    #[error(transparent)]
    InvalidInput(#[from] CommonError),
}

impl FxError {
    /// Check if retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FxError::Fetch { .. })
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
