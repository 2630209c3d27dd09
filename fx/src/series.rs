//! Date-ordered rate tables.

use std::collections::btree_map;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use refrates_common::Currency;
use serde::{Deserialize, Serialize};

/// Rates published for one date, keyed by currency.
pub type DayRates = BTreeMap<Currency, f64>;

/// Rates per date, ascending by date.
///
/// The upstream feed lists dates newest first; that order is not kept. Every
/// series is ascending regardless of the document it was parsed from.
///
/// Serializes as `{"2023-01-02": {"EUR": 1.0, "USD": 1.05, ...}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateSeries(BTreeMap<NaiveDate, DayRates>);

impl RateSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rates for a date, if that date is present.
    pub fn day(&self, date: NaiveDate) -> Option<&DayRates> {
        self.0.get(&date)
    }

    /// Rate for a currency on a date.
    pub fn rate(&self, date: NaiveDate, currency: &Currency) -> Option<f64> {
        self.0.get(&date).and_then(|day| day.get(currency)).copied()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, DayRates> {
        self.0.iter()
    }

    /// Rates for a date, creating an empty entry if needed.
    pub fn day_mut(&mut self, date: NaiveDate) -> &mut DayRates {
        self.0.entry(date).or_default()
    }

    pub fn insert_day(&mut self, date: NaiveDate, rates: DayRates) {
        self.0.insert(date, rates);
    }

    /// Apply `f` to every rate, keeping the dates and currencies.
    pub fn map_rates(&self, f: impl Fn(f64) -> f64) -> Self {
        self.0
            .iter()
            .map(|(date, day)| {
                let day = day.iter().map(|(c, v)| (c.clone(), f(*v))).collect();
                (*date, day)
            })
            .collect()
    }
}

impl FromIterator<(NaiveDate, DayRates)> for RateSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DayRates)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for RateSeries {
    type Item = (NaiveDate, DayRates);
    type IntoIter = btree_map::IntoIter<NaiveDate, DayRates>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RateSeries {
    type Item = (&'a NaiveDate, &'a DayRates);
    type IntoIter = btree_map::Iter<'a, NaiveDate, DayRates>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
