//! Rate series resolution: select, fetch or reuse, parse, rebase.

use std::sync::Arc;

use chrono::NaiveDate;
use refrates_common::{Clock, Currency, DateRange, SystemClock};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheBackend, CacheStore, CacheStoreConfig, FileCacheBackend};
use crate::config::{FxConfig, MissingBasePolicy};
use crate::endpoint::FeedVariant;
use crate::error::{FxError, FxResult};
use crate::fetcher::{FeedFetcher, HttpFeedFetcher};
use crate::parser::parse_series;
use crate::rebase::{rebase, rebase_skipping_gaps};
use crate::state::ConverterState;

/// Resolves rate series for any base currency and date range.
///
/// Holds no per-request state, so one resolver can be shared behind an `Arc`
/// by any number of concurrent callers.
pub struct FeedResolver {
    store: CacheStore,
    clock: Arc<dyn Clock>,
    missing_base: MissingBasePolicy,
}

impl FeedResolver {
    /// Create a resolver from explicit collaborators.
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        fetcher: Arc<dyn FeedFetcher>,
        clock: Arc<dyn Clock>,
        config: &FxConfig,
    ) -> FxResult<Self> {
        config.validate().map_err(FxError::Config)?;

        let freshness = chrono::Duration::from_std(config.freshness)
            .map_err(|_| FxError::Config("Cache freshness is out of range".to_string()))?;
        let store_config = CacheStoreConfig {
            feed_base_url: config.feed_base_url.clone(),
            freshness,
        };

        Ok(Self {
            store: CacheStore::new(backend, fetcher, clock.clone(), store_config),
            clock,
            missing_base: config.missing_base,
        })
    }

    /// Production resolver: disk cache, HTTP fetcher, system clock.
    pub fn from_config(config: &FxConfig) -> FxResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let backend = Arc::new(FileCacheBackend::new(config.cache_dir.clone()));
        let fetcher = Arc::new(HttpFeedFetcher::new(
            config.request_timeout,
            &config.user_agent,
        )?);
        Self::new(backend, fetcher, clock, config)
    }

    /// Latest date the feed is expected to cover.
    pub fn yesterday(&self) -> NaiveDate {
        self.clock.yesterday()
    }

    /// Fill in missing range bounds relative to [`Self::yesterday`].
    pub fn normalize_range(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> DateRange {
        DateRange::normalize(from, to, self.yesterday())
    }

    /// Load rates for `range` expressed against `base`.
    #[instrument(skip_all, fields(base = %base, range = %range))]
    pub async fn resolve(&self, base: &Currency, range: DateRange) -> FxResult<ConverterState> {
        let variant = FeedVariant::select(&range, self.yesterday());
        debug!(variant = %variant, "Selected feed variant");

        let document = self.store.resolve(variant).await?;
        let series = parse_series(&document, &range)?;

        let series = if base.is_eur() {
            series
        } else {
            match self.missing_base {
                MissingBasePolicy::Fail => rebase(&series, base)?,
                MissingBasePolicy::Skip => {
                    let rebased = rebase_skipping_gaps(&series, base);
                    if let (Some(first), Some(last)) =
                        (rebased.skipped.first(), rebased.skipped.last())
                    {
                        warn!(
                            skipped = rebased.skipped.len(),
                            first = %first,
                            last = %last,
                            "Base currency missing on some dates, skipping them"
                        );
                    }
                    rebased.series
                }
            }
        };

        info!(variant = %variant, dates = series.len(), "Rates loaded");

        Ok(ConverterState::new(base.clone(), range, variant, series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheBackend;
    use crate::fetcher::MockFeedFetcher;
    use refrates_common::FixedClock;

    const BASE_URL: &str = "https://feed.test/";

    const NINETY_DAY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gesmes:Envelope xmlns:gesmes="http://www.gesmes.org/xml/2002-08-01" xmlns="http://www.ecb.int/vocabulary/2002-08-01/eurofxref">
	<gesmes:subject>Reference rates</gesmes:subject>
	<gesmes:Sender>
		<gesmes:name>European Central Bank</gesmes:name>
	</gesmes:Sender>
	<Cube>
		<Cube time="2024-03-05">
			<Cube currency="USD" rate="1.0857"/>
			<Cube currency="GBP" rate="0.85420"/>
		</Cube>
		<Cube time="2024-03-04">
			<Cube currency="GBP" rate="0.85600"/>
		</Cube>
	</Cube>
</gesmes:Envelope>"#;

    fn date(s: &str) -> NaiveDate {
        refrates_common::parse_date(s).unwrap()
    }

    fn resolver(policy: MissingBasePolicy) -> (FeedResolver, Arc<MockFeedFetcher>) {
        let clock = Arc::new(FixedClock::at_date(date("2024-03-07")));
        let backend = Arc::new(MemoryCacheBackend::new(clock.clone()));
        let fetcher = Arc::new(MockFeedFetcher::new("mock"));
        fetcher.set_document(FeedVariant::NinetyDay.url(BASE_URL), NINETY_DAY);

        let config = FxConfig {
            feed_base_url: BASE_URL.to_string(),
            missing_base: policy,
            ..Default::default()
        };
        let resolver = FeedResolver::new(backend, fetcher.clone(), clock, &config).unwrap();
        (resolver, fetcher)
    }

    fn march() -> DateRange {
        DateRange::new(date("2024-03-01"), date("2024-03-06"))
    }

    #[tokio::test]
    async fn test_resolve_eur_keeps_feed_rates() {
        let (resolver, fetcher) = resolver(MissingBasePolicy::Skip);

        let state = resolver.resolve(&Currency::eur(), march()).await.unwrap();

        assert_eq!(state.variant(), FeedVariant::NinetyDay);
        assert_eq!(state.series().len(), 2);
        assert_eq!(state.series().rate(date("2024-03-05"), &Currency::usd()), Some(1.0857));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_resolve_skips_dates_without_base() {
        let (resolver, _) = resolver(MissingBasePolicy::Skip);

        let state = resolver.resolve(&Currency::usd(), march()).await.unwrap();

        assert_eq!(state.series().len(), 1);
        assert_eq!(state.series().rate(date("2024-03-05"), &Currency::usd()), Some(1.0));
        assert!(state.series().day(date("2024-03-04")).is_none());
    }

    #[tokio::test]
    async fn test_resolve_fail_policy_surfaces_missing_base() {
        let (resolver, _) = resolver(MissingBasePolicy::Fail);

        let result = resolver.resolve(&Currency::usd(), march()).await;

        assert!(matches!(
            result,
            Err(FxError::MissingBaseRate { date: d, .. }) if d == date("2024-03-04")
        ));
    }

    #[tokio::test]
    async fn test_second_resolve_reuses_cache() {
        let (resolver, fetcher) = resolver(MissingBasePolicy::Skip);

        resolver.resolve(&Currency::eur(), march()).await.unwrap();
        resolver.resolve(&Currency::gbp(), march()).await.unwrap();

        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn test_normalize_range_uses_clock() {
        let (resolver, _) = resolver(MissingBasePolicy::Skip);

        assert_eq!(resolver.yesterday(), date("2024-03-06"));
        assert_eq!(
            resolver.normalize_range(None, None),
            DateRange::single(date("2024-03-06"))
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let clock = Arc::new(FixedClock::at_date(date("2024-03-07")));
        let config = FxConfig {
            request_timeout: std::time::Duration::ZERO,
            ..Default::default()
        };

        let result = FeedResolver::new(
            Arc::new(MemoryCacheBackend::new(clock.clone())),
            Arc::new(MockFeedFetcher::new("mock")),
            clock,
            &config,
        );

        assert!(matches!(result, Err(FxError::Config(_))));
    }
}
