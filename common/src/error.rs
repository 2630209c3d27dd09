//! Error types for shared value parsing.

use thiserror::Error;

/// Errors raised while building common value types from caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Date string is not an ISO `YYYY-MM-DD` calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
}
