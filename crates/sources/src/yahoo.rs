//! Yahoo Finance daily price history.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset};
use time::{Month, OffsetDateTime};
use tracing::debug;
use valuescore_primitives::{Date, Listing, Market, PriceSeries};
use valuescore_traits::{PriceHistory, SourceError};
use yahoo_finance_api as yahoo;

/// Korea Standard Time, UTC+9.
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Configuration for the Yahoo Finance adapter.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Symbol of the benchmark index.
    pub benchmark: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self { benchmark: "^KS11".to_string() }
    }
}

/// Yahoo Finance symbol of a listing (`005930.KS`, `247540.KQ`).
#[must_use]
pub fn yahoo_symbol(listing: &Listing) -> String {
    let suffix = match listing.market {
        Market::Kospi => "KS",
        Market::Kosdaq => "KQ",
    };
    format!("{}.{suffix}", listing.ticker)
}

fn to_offset_datetime(date: Date) -> Result<OffsetDateTime, SourceError> {
    let invalid = |e: time::error::ComponentRange| SourceError::Parse(format!("date {date}: {e}"));
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| SourceError::Parse(format!("date {date}: invalid month")))?;
    let day = u8::try_from(date.day()).map_err(|e| SourceError::Parse(e.to_string()))?;
    let date = time::Date::from_calendar_date(date.year(), month, day).map_err(invalid)?;
    Ok(date.midnight().assume_utc())
}

/// Trading day of a quote timestamp, in exchange time.
fn trading_day(timestamp: i64) -> Option<Date> {
    let offset = FixedOffset::east_opt(KST_OFFSET_SECS)?;
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&offset).date_naive())
}

/// Daily closes through Yahoo Finance.
pub struct YahooPriceHistory {
    provider: yahoo::YahooConnector,
    config: YahooConfig,
}

impl fmt::Debug for YahooPriceHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YahooPriceHistory").field("config", &self.config).finish_non_exhaustive()
    }
}

impl YahooPriceHistory {
    /// Create an adapter with default configuration.
    ///
    /// # Errors
    /// Fails if the Yahoo connector cannot be built.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_config(YahooConfig::default())
    }

    /// Create an adapter with custom configuration.
    ///
    /// # Errors
    /// Fails if the Yahoo connector cannot be built.
    pub fn with_config(config: YahooConfig) -> Result<Self, SourceError> {
        let provider = yahoo::YahooConnector::new().map_err(|e| SourceError::Request(e.to_string()))?;
        Ok(Self { provider, config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &YahooConfig {
        &self.config
    }

    async fn closes(&self, symbol: &str, start: Date, end: Date) -> Result<PriceSeries, SourceError> {
        // end bound is exclusive on the Yahoo side
        let end = end.succ_opt().unwrap_or(end);
        let response = self
            .provider
            .get_quote_history(symbol, to_offset_datetime(start)?, to_offset_datetime(end)?)
            .await
            .map_err(|e| SourceError::Request(format!("{symbol}: {e}")))?;
        let quotes = response.quotes().map_err(|e| SourceError::NoData(format!("{symbol}: {e}")))?;

        let series: PriceSeries = quotes
            .iter()
            .filter(|q| q.close.is_finite() && q.close > 0.0)
            .filter_map(|q| Some((trading_day(q.timestamp)?, q.close)))
            .collect();
        if series.is_empty() {
            return Err(SourceError::NoData(format!("{symbol}: no closes between {start} and {end}")));
        }
        debug!(symbol, closes = series.len(), "fetched daily closes");
        Ok(series)
    }
}

impl PriceHistory for YahooPriceHistory {
    async fn daily_closes(
        &self,
        listing: &Listing,
        start: Date,
        end: Date,
    ) -> Result<PriceSeries, SourceError> {
        self.closes(&yahoo_symbol(listing), start, end).await
    }

    async fn benchmark_closes(&self, start: Date, end: Date) -> Result<PriceSeries, SourceError> {
        self.closes(&self.config.benchmark, start, end).await
    }
}
