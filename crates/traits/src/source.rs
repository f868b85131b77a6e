//! Data source trait definitions.
//!
//! Implementations are awaited one request at a time; none of the pipeline
//! stages issue concurrent calls.

use valuescore_primitives::{Date, Listing, MarketSnapshot, PriceSeries, StatementTable, Ticker};

use crate::SourceError;

/// Source of market-wide daily quotes.
pub trait MarketDataSource {
    /// Quotes (close, market cap, shares, PER, PBR, name) for every listed
    /// ticker on the latest trading day at or before `date`.
    fn snapshot(
        &self,
        date: Date,
    ) -> impl Future<Output = Result<MarketSnapshot, SourceError>> + Send;
}

/// Source of published financial statement tables.
pub trait StatementSource {
    /// Statement tables of a ticker's statement page, in page order.
    ///
    /// The section index of a table is its position in the returned vector.
    fn statement_tables(
        &self,
        ticker: &Ticker,
    ) -> impl Future<Output = Result<Vec<StatementTable>, SourceError>> + Send;
}

/// Source of daily closing prices.
pub trait PriceHistory {
    /// Daily closes of a listed ticker between `start` and `end`, inclusive.
    fn daily_closes(
        &self,
        listing: &Listing,
        start: Date,
        end: Date,
    ) -> impl Future<Output = Result<PriceSeries, SourceError>> + Send;

    /// Daily closes of the benchmark index between `start` and `end`, inclusive.
    fn benchmark_closes(
        &self,
        start: Date,
        end: Date,
    ) -> impl Future<Output = Result<PriceSeries, SourceError>> + Send;
}

#[cfg(test)]
mod tests {
    use valuescore_primitives::Market;

    use super::*;

    struct FlatHistory;

    impl PriceHistory for FlatHistory {
        async fn daily_closes(
            &self,
            _listing: &Listing,
            start: Date,
            end: Date,
        ) -> Result<PriceSeries, SourceError> {
            Ok([(start, 100.0), (end, 100.0)].into_iter().collect())
        }

        async fn benchmark_closes(&self, _start: Date, _end: Date) -> Result<PriceSeries, SourceError> {
            Err(SourceError::NoData("benchmark".to_string()))
        }
    }

    #[tokio::test]
    async fn price_history_is_usable_through_generics() {
        async fn closes<H: PriceHistory>(history: &H) -> Result<PriceSeries, SourceError> {
            let start = Date::from_ymd_opt(2024, 1, 2).unwrap();
            let end = Date::from_ymd_opt(2024, 1, 3).unwrap();
            history.daily_closes(&Listing::new("005930", Market::Kospi, "삼성전자"), start, end).await
        }

        let series = closes(&FlatHistory).await.unwrap();
        assert_eq!(series.len(), 2);

        let start = Date::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(FlatHistory.benchmark_closes(start, start).await.is_err());
    }
}
