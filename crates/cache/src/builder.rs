//! Sequential cache construction from a statement source.

use std::time::Duration;

use tracing::{debug, info, warn};
use valuescore_primitives::Ticker;
use valuescore_traits::StatementSource;

use crate::{CacheError, FinancialCache, extract_snapshots};

/// Configuration for cache construction.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Pause between successive statement requests.
    pub request_delay: Duration,
    /// Consecutive transport failures after which the build is aborted.
    pub max_transport_failures: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { request_delay: Duration::from_millis(200), max_transport_failures: 10 }
    }
}

/// A ticker left out of the cache.
#[derive(Debug)]
pub struct SkippedFetch {
    /// Ticker that could not be cached.
    pub ticker: Ticker,
    /// Why it was left out.
    pub reason: CacheError,
}

/// Outcome of a cache build.
#[derive(Debug, Default)]
pub struct CacheBuild {
    /// Tickers whose statements were fetched and extracted.
    pub cache: FinancialCache,
    /// Tickers that failed, in request order.
    pub skipped: Vec<SkippedFetch>,
}

/// Builds a [`FinancialCache`] one ticker at a time.
#[derive(Debug, Clone)]
pub struct CacheBuilder<S> {
    source: S,
    config: CacheConfig,
}

impl<S: StatementSource> CacheBuilder<S> {
    /// Create a builder with default configuration.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(source, CacheConfig::default())
    }

    /// Create a builder with custom configuration.
    #[must_use]
    pub const fn with_config(source: S, config: CacheConfig) -> Self {
        Self { source, config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Fetch and extract the statements of every ticker in `universe`.
    ///
    /// Per-ticker failures are recorded in [`CacheBuild::skipped`].
    ///
    /// # Errors
    /// Returns [`CacheError::Unreachable`] once `max_transport_failures`
    /// consecutive requests fail at the transport level.
    pub async fn build(&self, universe: &[Ticker]) -> Result<CacheBuild, CacheError> {
        let mut build = CacheBuild::default();
        let mut transport_failures = 0;

        for (i, ticker) in universe.iter().enumerate() {
            if i > 0 && !self.config.request_delay.is_zero() {
                tokio::time::sleep(self.config.request_delay).await;
            }

            let reason = match self.source.statement_tables(ticker).await {
                Ok(tables) => {
                    transport_failures = 0;
                    match extract_snapshots(&tables) {
                        Ok(record) => {
                            debug!(ticker = %ticker, "cached statements");
                            build.cache.insert(ticker.clone(), record);
                            continue;
                        }
                        Err(err) => CacheError::from(err),
                    }
                }
                Err(err) if !err.is_recoverable() => {
                    transport_failures += 1;
                    if transport_failures >= self.config.max_transport_failures {
                        return Err(CacheError::Unreachable { failures: transport_failures, last: err });
                    }
                    warn!(ticker = %ticker, reason = %err, "statement request failed");
                    CacheError::from(err)
                }
                Err(err) => {
                    transport_failures = 0;
                    CacheError::from(err)
                }
            };

            debug!(ticker = %ticker, reason = %reason, "skipping ticker");
            build.skipped.push(SkippedFetch { ticker: ticker.clone(), reason });
        }

        info!(cached = build.cache.len(), skipped = build.skipped.len(), "statement cache built");
        Ok(build)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use valuescore_primitives::{ExtractionError, StatementTable};
    use valuescore_traits::SourceError;

    use super::*;
    use crate::extract::tests::statement_page;

    #[derive(Default)]
    struct FakeStatements {
        pages: BTreeMap<Ticker, Vec<StatementTable>>,
        offline: bool,
    }

    impl StatementSource for FakeStatements {
        async fn statement_tables(&self, ticker: &Ticker) -> Result<Vec<StatementTable>, SourceError> {
            if self.offline {
                return Err(SourceError::Request("connection refused".to_string()));
            }
            self.pages.get(ticker).cloned().ok_or_else(|| SourceError::NoData(ticker.to_string()))
        }
    }

    fn config() -> CacheConfig {
        CacheConfig { request_delay: Duration::ZERO, max_transport_failures: 3 }
    }

    #[tokio::test]
    async fn failures_are_skipped_with_reasons() {
        // quarterly sections are read first, so table 3 is the first one missed
        let mut broken = statement_page();
        broken.truncate(3);
        let source = FakeStatements {
            pages: BTreeMap::from([
                (Ticker::new("005930"), statement_page()),
                (Ticker::new("000660"), broken),
            ]),
            offline: false,
        };
        let universe = [Ticker::new("005930"), Ticker::new("000660"), Ticker::new("035420")];

        let build = CacheBuilder::with_config(source, config()).build(&universe).await.unwrap();

        assert_eq!(build.cache.len(), 1);
        assert!(build.cache.record(&Ticker::new("005930")).is_some());
        assert_eq!(build.skipped.len(), 2);
        assert_eq!(build.skipped[0].ticker, Ticker::new("000660"));
        assert!(matches!(
            build.skipped[0].reason,
            CacheError::Extraction(ExtractionError::MissingTable(3))
        ));
        assert!(matches!(build.skipped[1].reason, CacheError::Source(SourceError::NoData(_))));
    }

    #[tokio::test]
    async fn unreachable_source_aborts() {
        let source = FakeStatements { offline: true, ..Default::default() };
        let universe: Vec<Ticker> = (0..5).map(|i| Ticker::new(format!("00000{i}"))).collect();

        let err = CacheBuilder::with_config(source, config()).build(&universe).await.unwrap_err();
        assert!(matches!(err, CacheError::Unreachable { failures: 3, .. }));
    }

    #[tokio::test]
    async fn empty_universe_builds_empty_cache() {
        let build = CacheBuilder::new(FakeStatements::default()).build(&[]).await.unwrap();
        assert!(build.cache.is_empty());
        assert!(build.skipped.is_empty());
    }
}
