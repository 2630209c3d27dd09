//! refrates FX
//!
//! Euro foreign exchange reference rates, re-expressed against any base
//! currency.
//!
//! # Features
//!
//! - Daily, 90-day and historical feed selection by requested date range
//! - Document cache with freshness window and stale fallback on fetch failure
//! - Rebasing from EUR to any published currency
//! - Symbol filtering and amount conversion over whole series
//!
//! # Example
//!
//! ```rust,ignore
//! use refrates_fx::{FxConfig, RateProvider};
//!
//! let mut provider = RateProvider::from_config(&FxConfig::from_env(), "USD")?;
//!
//! // Yesterday's rates for GBP and JPY against USD
//! let rates = provider.symbols(["GBP", "JPY"]).load(None, None).await?.rates()?;
//!
//! // What 100 USD was worth on each date
//! let converted = provider.convert(100.0)?;
//! ```

pub mod cache;
pub mod config;
pub mod conversion;
pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod parser;
pub mod provider;
pub mod rebase;
pub mod resolver;
pub mod series;
pub mod state;

pub use cache::{CacheBackend, CacheStore, CacheStoreConfig, FileCacheBackend, MemoryCacheBackend};
pub use config::{FxConfig, MissingBasePolicy};
pub use conversion::{convert_series, ConversionResponse, RatesResponse};
pub use endpoint::FeedVariant;
pub use error::{FxError, FxResult};
pub use fetcher::{FeedFetcher, HttpFeedFetcher};
pub use filter::filter_symbols;
pub use parser::parse_series;
pub use provider::RateProvider;
pub use rebase::{rebase, rebase_skipping_gaps, Rebased};
pub use resolver::FeedResolver;
pub use series::{DayRates, RateSeries};
pub use state::ConverterState;

#[cfg(any(test, feature = "test-utils"))]
pub use fetcher::MockFeedFetcher;
