//! Resolved rate state for one load.

use std::collections::BTreeSet;

use refrates_common::{Currency, DateRange};

use crate::conversion::{convert_series, ConversionResponse, RatesResponse};
use crate::endpoint::FeedVariant;
use crate::filter::filter_symbols;
use crate::series::RateSeries;

/// Rates resolved for a base currency and date range.
///
/// Immutable: narrowing the symbol set returns a new value, and the resolved
/// series itself is never altered by reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterState {
    base: Currency,
    range: DateRange,
    variant: FeedVariant,
    symbols: BTreeSet<Currency>,
    series: RateSeries,
}

impl ConverterState {
    pub fn new(base: Currency, range: DateRange, variant: FeedVariant, series: RateSeries) -> Self {
        Self {
            base,
            range,
            variant,
            symbols: BTreeSet::new(),
            series,
        }
    }

    /// Same rates, reported only for `symbols` (empty means all).
    pub fn with_symbols(self, symbols: BTreeSet<Currency>) -> Self {
        Self { symbols, ..self }
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Feed document the rates came from.
    pub fn variant(&self) -> FeedVariant {
        self.variant
    }

    pub fn symbols(&self) -> &BTreeSet<Currency> {
        &self.symbols
    }

    /// Full resolved series, before symbol filtering.
    pub fn series(&self) -> &RateSeries {
        &self.series
    }

    /// Rates against the base, restricted to the symbol set.
    pub fn rates(&self) -> RatesResponse {
        RatesResponse {
            base: self.base.clone(),
            data: filter_symbols(&self.series, &self.symbols),
        }
    }

    /// Value of `amount` units of the base, restricted to the symbol set.
    pub fn convert(&self, amount: f64) -> ConversionResponse {
        let filtered = filter_symbols(&self.series, &self.symbols);
        ConversionResponse {
            base: self.base.clone(),
            base_amount: amount,
            data: convert_series(&filtered, amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn state() -> ConverterState {
        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let mut series = RateSeries::new();
        let day = series.day_mut(date);
        day.insert(Currency::eur(), 1.0);
        day.insert(Currency::usd(), 1.05);
        day.insert(Currency::gbp(), 0.88);
        ConverterState::new(
            Currency::eur(),
            DateRange::single(date),
            FeedVariant::NinetyDay,
            series,
        )
    }

    #[test]
    fn test_rates_without_symbols_returns_everything() {
        let response = state().rates();

        assert_eq!(response.base, Currency::eur());
        assert_eq!(&response.data, state().series());
    }

    #[test]
    fn test_symbols_gate_reads_without_touching_series() {
        let symbols = [Currency::usd()].into_iter().collect();
        let filtered = state().with_symbols(symbols);

        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        assert_eq!(filtered.rates().data.day(date).unwrap().len(), 1);
        assert_eq!(filtered.series().day(date).unwrap().len(), 3);

        let widened = filtered.with_symbols(BTreeSet::new());
        assert_eq!(widened.rates().data.day(date).unwrap().len(), 3);
    }

    #[test]
    fn test_convert_filters_then_scales() {
        let symbols = [Currency::gbp()].into_iter().collect();
        let response = state().with_symbols(symbols).convert(10.0);
        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();

        assert_eq!(response.base_amount, 10.0);
        assert_eq!(response.data.day(date).unwrap().len(), 1);
        assert!((response.data.rate(date, &Currency::gbp()).unwrap() - 8.8).abs() < 1e-12);
    }
}
