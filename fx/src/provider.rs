//! Caller-facing rate provider.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use refrates_common::{Currency, DateRange};

use crate::config::FxConfig;
use crate::conversion::{ConversionResponse, RatesResponse};
use crate::error::{FxError, FxResult};
use crate::resolver::FeedResolver;
use crate::state::ConverterState;

/// Loads rates for one base currency and serves filtered or converted views.
///
/// One provider belongs to one caller. Share the [`FeedResolver`] instead when
/// serving several requests at once.
pub struct RateProvider {
    resolver: Arc<FeedResolver>,
    base: Currency,
    symbols: BTreeSet<Currency>,
    state: Option<ConverterState>,
}

impl RateProvider {
    /// Create a provider reporting rates against `base`.
    pub fn new(resolver: Arc<FeedResolver>, base: impl Into<Currency>) -> Self {
        Self {
            resolver,
            base: base.into(),
            symbols: BTreeSet::new(),
            state: None,
        }
    }

    /// Create a provider with the feed's native EUR base.
    pub fn eur(resolver: Arc<FeedResolver>) -> Self {
        Self::new(resolver, Currency::eur())
    }

    /// Create a provider backed by the production resolver for `config`.
    pub fn from_config(config: &FxConfig, base: impl Into<Currency>) -> FxResult<Self> {
        let resolver = FeedResolver::from_config(config)?;
        Ok(Self::new(Arc::new(resolver), base))
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    /// Loaded state, if [`Self::load`] has succeeded.
    pub fn state(&self) -> Option<&ConverterState> {
        self.state.as_ref()
    }

    /// Resolve rates for the given bounds, replacing anything loaded before.
    ///
    /// Missing bounds default as described on [`DateRange::normalize`].
    pub async fn load(
        &mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> FxResult<&mut Self> {
        let range = self.resolver.normalize_range(from, to);
        self.load_range(range).await
    }

    /// Like [`Self::load`], with ISO `YYYY-MM-DD` bounds.
    pub async fn load_str(
        &mut self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> FxResult<&mut Self> {
        let range = DateRange::parse(from, to, self.resolver.yesterday())?;
        self.load_range(range).await
    }

    /// Resolve rates for an already normalized range.
    pub async fn load_range(&mut self, range: DateRange) -> FxResult<&mut Self> {
        let state = self.resolver.resolve(&self.base, range).await?;
        self.state = Some(state.with_symbols(self.symbols.clone()));
        Ok(self)
    }

    /// Report only these currencies from now on. An empty list means all.
    pub fn symbols<I, C>(&mut self, symbols: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Currency>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        if let Some(state) = self.state.take() {
            self.state = Some(state.with_symbols(self.symbols.clone()));
        }
        self
    }

    /// Loaded rates against the base currency.
    pub fn rates(&self) -> FxResult<RatesResponse> {
        self.loaded().map(ConverterState::rates)
    }

    /// Loaded rates scaled to `amount` units of the base currency.
    pub fn convert(&self, amount: f64) -> FxResult<ConversionResponse> {
        self.loaded().map(|state| state.convert(amount))
    }

    fn loaded(&self) -> FxResult<&ConverterState> {
        self.state.as_ref().ok_or(FxError::NotLoaded)
    }
}
