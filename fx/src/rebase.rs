//! Re-expressing EUR-relative rates against another base currency.

use chrono::NaiveDate;
use refrates_common::Currency;

use crate::error::{FxError, FxResult};
use crate::series::{DayRates, RateSeries};

/// Result of a rebase that tolerates dates without a base rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebased {
    /// Rates for the dates that could be rebased.
    pub series: RateSeries,
    /// Dates dropped because the base currency had no usable rate.
    pub skipped: Vec<NaiveDate>,
}

/// Divide every rate on every date by that date's rate for `base`.
///
/// Fails on the first date without a rate for `base`. A EUR-relative series
/// rebased to EUR comes back unchanged, and a series rebased elsewhere returns
/// to its feed rates when rebased to EUR again.
pub fn rebase(series: &RateSeries, base: &Currency) -> FxResult<RateSeries> {
    series
        .iter()
        .map(|(date, day)| {
            rebase_day(day, base)
                .map(|rebased| (*date, rebased))
                .ok_or_else(|| FxError::MissingBaseRate {
                    base: base.clone(),
                    date: *date,
                })
        })
        .collect()
}

/// Like [`rebase`], but drops dates lacking a rate for `base` instead of failing.
pub fn rebase_skipping_gaps(series: &RateSeries, base: &Currency) -> Rebased {
    let mut rebased = RateSeries::new();
    let mut skipped = Vec::new();
    for (date, day) in series {
        match rebase_day(day, base) {
            Some(day) => rebased.insert_day(*date, day),
            None => skipped.push(*date),
        }
    }

    Rebased {
        series: rebased,
        skipped,
    }
}

/// A zero base rate counts as missing; dividing by it yields no usable rates.
fn rebase_day(day: &DayRates, base: &Currency) -> Option<DayRates> {
    let base_rate = day.get(base).copied().filter(|rate| *rate != 0.0)?;
    Some(
        day.iter()
            .map(|(currency, value)| (currency.clone(), value / base_rate))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(rates: &[(&str, f64)]) -> DayRates {
        rates.iter().map(|(c, v)| (Currency::new(*c), *v)).collect()
    }

    fn sample() -> RateSeries {
        let mut series = RateSeries::new();
        series.insert_day(
            date(2023, 1, 2),
            day(&[("EUR", 1.0), ("USD", 1.05), ("GBP", 0.88)]),
        );
        series
    }

    #[test]
    fn test_rebase_to_usd() {
        let rebased = rebase(&sample(), &Currency::usd()).unwrap();
        let d = date(2023, 1, 2);

        assert_eq!(rebased.rate(d, &Currency::usd()), Some(1.0));
        assert_relative_eq!(
            rebased.rate(d, &Currency::eur()).unwrap(),
            0.952_380_952_380_952,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            rebased.rate(d, &Currency::gbp()).unwrap(),
            0.838_095_238_095_238,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_rebase_to_eur_is_identity() {
        assert_eq!(rebase(&sample(), &Currency::eur()).unwrap(), sample());
        assert_eq!(
            rebase_skipping_gaps(&sample(), &Currency::eur()).series,
            sample()
        );
    }

    #[test]
    fn test_rebase_back_to_eur_recovers_feed_rates() {
        let usd = rebase(&sample(), &Currency::usd()).unwrap();
        let back = rebase(&usd, &Currency::eur()).unwrap();
        let d = date(2023, 1, 2);

        for (currency, rate) in sample().day(d).unwrap() {
            assert_relative_eq!(back.rate(d, currency).unwrap(), *rate, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_missing_base_fails_strict_rebase() {
        let mut series = sample();
        series.insert_day(date(2023, 1, 3), day(&[("EUR", 1.0), ("GBP", 0.89)]));

        let result = rebase(&series, &Currency::usd());

        match result {
            Err(FxError::MissingBaseRate { base, date: missing }) => {
                assert_eq!(base, Currency::usd());
                assert_eq!(missing, date(2023, 1, 3));
            }
            other => panic!("expected missing base rate, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_base_is_skipped_in_lenient_rebase() {
        let mut series = sample();
        series.insert_day(date(2023, 1, 3), day(&[("EUR", 1.0), ("GBP", 0.89)]));

        let rebased = rebase_skipping_gaps(&series, &Currency::usd());

        assert_eq!(rebased.skipped, vec![date(2023, 1, 3)]);
        assert_eq!(rebased.series.len(), 1);
        assert_eq!(rebased.series.rate(date(2023, 1, 2), &Currency::usd()), Some(1.0));
    }

    #[test]
    fn test_zero_base_rate_counts_as_missing() {
        let mut series = RateSeries::new();
        series.insert_day(date(2023, 1, 2), day(&[("EUR", 1.0), ("XAU", 0.0)]));

        assert!(rebase(&series, &Currency::new("XAU")).is_err());
        assert_eq!(
            rebase_skipping_gaps(&series, &Currency::new("XAU")).skipped.len(),
            1
        );
    }

    #[test]
    fn test_empty_series_rebases_to_empty() {
        let rebased = rebase(&RateSeries::new(), &Currency::usd()).unwrap();
        assert!(rebased.is_empty());
    }
}
