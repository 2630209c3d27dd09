//! Restricting series to an allow-list of currencies.

use std::collections::BTreeSet;

use refrates_common::Currency;

use crate::series::RateSeries;

/// Keep only the currencies in `symbols` on every date.
///
/// An empty allow-list means no restriction. Requested currencies missing on a
/// date are simply absent from that date, and dates are kept even when nothing
/// on them matches.
pub fn filter_symbols(series: &RateSeries, symbols: &BTreeSet<Currency>) -> RateSeries {
    if symbols.is_empty() {
        return series.clone();
    }

    series
        .iter()
        .map(|(date, day)| {
            let kept = day
                .iter()
                .filter(|(currency, _)| symbols.contains(*currency))
                .map(|(currency, value)| (currency.clone(), *value))
                .collect();
            (*date, kept)
        })
        .collect()
}
