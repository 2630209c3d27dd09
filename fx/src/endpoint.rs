//! Feed variant selection.

use std::fmt;

use chrono::NaiveDate;
use refrates_common::{constants::NINETY_DAY_WINDOW, days_between, DateRange};

/// One of the three documents the upstream feed publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedVariant {
    /// Latest business day only.
    Daily,
    /// The trailing 90 days.
    NinetyDay,
    /// Every business day since the euro's introduction.
    Historical,
}

impl FeedVariant {
    pub const ALL: [FeedVariant; 3] = [
        FeedVariant::Daily,
        FeedVariant::NinetyDay,
        FeedVariant::Historical,
    ];

    /// Pick the smallest document that covers `range`.
    ///
    /// The distance is the larger absolute day count between `yesterday` and
    /// either bound; future dates are measured the same way as past ones.
    pub fn select(range: &DateRange, yesterday: NaiveDate) -> Self {
        let distance = days_between(yesterday, range.from())
            .abs()
            .max(days_between(yesterday, range.to()).abs());

        match distance {
            0 => FeedVariant::Daily,
            d if d <= NINETY_DAY_WINDOW => FeedVariant::NinetyDay,
            _ => FeedVariant::Historical,
        }
    }

    /// Upstream resource name.
    pub fn resource(&self) -> &'static str {
        match self {
            FeedVariant::Daily => "eurofxref-daily.xml",
            FeedVariant::NinetyDay => "eurofxref-hist-90d.xml",
            FeedVariant::Historical => "eurofxref-hist.xml",
        }
    }

    /// Key the fetched document is cached under.
    pub fn cache_key(&self) -> &'static str {
        match self {
            FeedVariant::Daily => "latest_rates.xml",
            FeedVariant::NinetyDay => "90_rates.xml",
            FeedVariant::Historical => "historic_rates.xml",
        }
    }

    /// Full URL of this variant under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        if base_url.ends_with('/') {
            format!("{}{}", base_url, self.resource())
        } else {
            format!("{}/{}", base_url, self.resource())
        }
    }
}

impl fmt::Display for FeedVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedVariant::Daily => "daily",
            FeedVariant::NinetyDay => "90-day",
            FeedVariant::Historical => "historical",
        };
        f.write_str(name)
    }
}
