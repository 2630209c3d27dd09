//! Currency conversion types and operations.

use refrates_common::Currency;
use serde::{Deserialize, Serialize};

use crate::series::RateSeries;

/// Rates expressed against `base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesResponse {
    /// Base currency.
    pub base: Currency,
    /// Rates per date.
    pub data: RateSeries,
}

/// Value of `base_amount` units of `base` in every listed currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResponse {
    /// Base currency.
    pub base: Currency,
    /// Amount being converted.
    pub base_amount: f64,
    /// Converted amounts per date.
    pub data: RateSeries,
}

/// Multiply every rate by `amount`.
///
/// No rounding and no clamping: zero and negative amounts scale linearly.
pub fn convert_series(series: &RateSeries, amount: f64) -> RateSeries {
    series.map_rates(|rate| rate * amount)
}
