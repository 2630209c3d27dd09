//! Currency codes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommonError;

/// ISO 4217 currency code.
///
/// Codes are always stored upper-cased, so `Currency::new("usd")` and
/// `Currency::new("USD")` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Create a currency from a code, checking that it is three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, CommonError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CommonError::InvalidCurrency(code.to_string()));
        }
        Ok(Self::new(trimmed))
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Whether this is the euro, the feed's native reference currency.
    pub fn is_eur(&self) -> bool {
        self.0 == "EUR"
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::eur()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_uppercased() {
        assert_eq!(Currency::new("usd"), Currency::usd());
        assert_eq!(Currency::from("gbp").code(), "GBP");
    }

    #[test]
    fn test_parse_validates_shape() {
        assert_eq!(Currency::parse(" chf ").unwrap().code(), "CHF");
        assert!(matches!(
            Currency::parse("EURO"),
            Err(CommonError::InvalidCurrency(_))
        ));
        assert!(Currency::parse("U5D").is_err());
        assert!(Currency::parse("").is_err());
    }

    #[test]
    fn test_default_is_eur() {
        assert!(Currency::default().is_eur());
        assert!(!Currency::usd().is_eur());
    }

    #[test]
    fn test_serializes_as_plain_code() {
        let json = serde_json::to_string(&Currency::jpy()).unwrap();
        assert_eq!(json, "\"JPY\"");
    }
}
