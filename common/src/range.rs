//! Requested date windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommonError;

/// ISO calendar date format used by the feed and by callers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive window of calendar dates, always with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Create a range, swapping the bounds if they are reversed.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// A range covering a single day.
    pub fn single(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    /// Fill in missing bounds.
    ///
    /// A lone bound collapses the range to that one day. With neither, it is
    /// `yesterday` alone.
    pub fn normalize(from: Option<NaiveDate>, to: Option<NaiveDate>, yesterday: NaiveDate) -> Self {
        match (from, to) {
            (Some(from), Some(to)) => Self::new(from, to),
            (Some(from), None) => Self::single(from),
            (None, Some(to)) => Self::single(to),
            (None, None) => Self::single(yesterday),
        }
    }

    /// Parse optional ISO `YYYY-MM-DD` bounds and normalize them.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        yesterday: NaiveDate,
    ) -> Result<Self, CommonError> {
        let from = from.map(parse_date).transpose()?;
        let to = to.map(parse_date).transpose()?;
        Ok(Self::normalize(from, to, yesterday))
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Whether `date` falls inside the window, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

/// Parse an ISO calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, CommonError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| CommonError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_normalize_defaults_to_yesterday() {
        let yesterday = date("2024-05-09");
        let range = DateRange::normalize(None, None, yesterday);

        assert_eq!(range.from(), yesterday);
        assert_eq!(range.to(), yesterday);
    }

    #[test]
    fn test_normalize_single_bound_collapses() {
        let yesterday = date("2024-05-09");
        let range = DateRange::normalize(Some(date("2024-01-15")), None, yesterday);

        assert_eq!(range, DateRange::single(date("2024-01-15")));
    }

    #[test]
    fn test_normalize_only_to_collapses() {
        let yesterday = date("2024-05-09");
        let range = DateRange::normalize(None, Some(date("2024-05-01")), yesterday);

        assert_eq!(range, DateRange::single(date("2024-05-01")));
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let range = DateRange::new(date("2024-02-10"), date("2024-02-01"));

        assert_eq!(range.from(), date("2024-02-01"));
        assert_eq!(range.to(), date("2024-02-10"));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date("2024-02-01"), date("2024-02-10"));

        assert!(range.contains(date("2024-02-01")));
        assert!(range.contains(date("2024-02-10")));
        assert!(!range.contains(date("2024-01-31")));
        assert!(!range.contains(date("2024-02-11")));
    }

    #[test]
    fn test_parse_rejects_bad_dates() {
        let yesterday = date("2024-05-09");

        assert!(DateRange::parse(Some("2024-02-01"), Some("2024-02-03"), yesterday).is_ok());
        assert!(matches!(
            DateRange::parse(Some("02/01/2024"), None, yesterday),
            Err(CommonError::InvalidDate(_))
        ));
        assert!(DateRange::parse(None, Some("2024-02-30"), yesterday).is_err());
    }
}
