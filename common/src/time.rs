//! Time utilities and the clock capability.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;

/// Feed timing constants.
pub mod constants {
    use super::Duration;

    /// Maximum age of a cached feed document before it is refetched (8 hours).
    pub fn cache_freshness() -> Duration {
        Duration::hours(8)
    }

    /// How far the latest published reference rates trail the current date.
    pub fn publication_lag() -> Duration {
        Duration::days(1)
    }

    /// Largest day distance still served by the 90-day feed.
    pub const NINETY_DAY_WINDOW: i64 = 90;
}

/// A timestamp with timezone (always UTC).
pub type Timestamp = DateTime<Utc>;

/// Source of the current time.
///
/// Everything that depends on "now" (the default date range, cache age) reads it
/// through this trait so tests can pin it.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;

    /// The most recent date the feed is expected to have published.
    fn yesterday(&self) -> NaiveDate {
        (self.now() - constants::publication_lag()).date_naive()
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that returns a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Create a clock frozen at midday UTC on the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        let midnight = date.and_time(NaiveTime::default()).and_utc();
        Self::new(midnight + Duration::hours(12))
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        *self.now.write() = now;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }
}

/// Signed whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}
