//! Scoring engine: rubric evaluation and ranking over the ticker universe.

use tracing::{debug, info};
use valuescore_cache::FinancialCache;
use valuescore_math::{
    MetricError, current_ratio_score, debt_ratio_score, decreasing_debt_score,
    increasing_profit_score, pbr_score, per_score, positive_profit_score, prr_score, psr_score,
    roa_score,
};
use valuescore_primitives::{
    Date, ExtractionError, FinancialRecord, LineItem, MarketSnapshot, MetricName, Quote,
    ScoreVector, Ticker,
};

use crate::ScoringError;

/// Configuration for the scoring engine.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Quarters summed for trailing figures.
    pub trailing_quarters: usize,
    /// Annual periods handed to the trend rubrics.
    pub trend_years: usize,
    /// Decimal places kept in the ranked table.
    pub decimals: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { trailing_quarters: 4, trend_years: 3, decimals: 3 }
    }
}

/// Market data and universe for one scoring run.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    snapshot: MarketSnapshot,
    min_market_cap: f64,
    universe: Vec<Ticker>,
}

impl ScoringContext {
    /// Minimum market cap (억원) of the default universe.
    pub const DEFAULT_MIN_MARKET_CAP: f64 = 1000.0;

    /// Build a context; the universe is every ticker whose market cap is at
    /// least `min_market_cap` (억원).
    #[must_use]
    pub fn new(snapshot: MarketSnapshot, min_market_cap: f64) -> Self {
        let universe = snapshot.universe(min_market_cap);
        Self { snapshot, min_market_cap, universe }
    }

    /// Trading day of the market snapshot.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.snapshot.date
    }

    /// Market cap threshold of the universe.
    #[must_use]
    pub const fn min_market_cap(&self) -> f64 {
        self.min_market_cap
    }

    /// Tickers eligible for scoring, in ticker order.
    #[must_use]
    pub fn universe(&self) -> &[Ticker] {
        &self.universe
    }

    /// Quote of a ticker.
    #[must_use]
    pub fn quote(&self, ticker: &Ticker) -> Option<&Quote> {
        self.snapshot.get(ticker)
    }

    /// Underlying market snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }
}

/// One ranked ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    /// Ticker.
    pub ticker: Ticker,
    /// Display name.
    pub name: String,
    /// Rubric scores and total.
    pub scores: ScoreVector,
}

/// A ticker left out of the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    /// Ticker.
    pub ticker: Ticker,
    /// Why it could not be scored.
    pub reason: ScoringError,
}

/// Ranked scores of a universe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    rows: Vec<ScoreRow>,
    skipped: Vec<SkippedTicker>,
}

impl ScoreBoard {
    /// Rows by total, highest first.
    #[must_use]
    pub fn rows(&self) -> &[ScoreRow] {
        &self.rows
    }

    /// The `n` highest-ranked rows.
    #[must_use]
    pub fn top(&self, n: usize) -> &[ScoreRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Tickers that could not be scored, in universe order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedTicker] {
        &self.skipped
    }

    /// Ranked tickers.
    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.rows.iter().map(|r| &r.ticker)
    }

    /// Number of ranked rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no ticker was ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rubric inputs gathered for one ticker.
#[derive(Debug)]
struct Inputs {
    per: f64,
    pbr: f64,
    price: f64,
    market_cap: f64,
    shares: f64,
    debt: f64,
    equity: f64,
    assets: f64,
    current_assets: f64,
    current_liabilities: f64,
    trailing_revenue: f64,
    trailing_net_profit: f64,
    trailing_investing_cash_flow: f64,
    operating_profits: Vec<f64>,
    annual_debt: Vec<f64>,
    annual_equity: Vec<f64>,
    annual_net_profits: Vec<f64>,
}

impl Inputs {
    fn non_finite(&self) -> Option<&'static str> {
        let scalars = [
            ("PER", self.per),
            ("PBR", self.pbr),
            ("close", self.price),
            ("market cap", self.market_cap),
            ("shares outstanding", self.shares),
            ("liabilities", self.debt),
            ("equity", self.equity),
            ("assets", self.assets),
            ("current assets", self.current_assets),
            ("current liabilities", self.current_liabilities),
            ("trailing revenue", self.trailing_revenue),
            ("trailing net profit", self.trailing_net_profit),
            ("trailing investing cash flow", self.trailing_investing_cash_flow),
        ];
        let series = [
            ("annual operating profit", &self.operating_profits),
            ("annual liabilities", &self.annual_debt),
            ("annual equity", &self.annual_equity),
            ("annual net profit", &self.annual_net_profits),
        ];
        scalars
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
            .or_else(|| series.into_iter().find(|(_, v)| v.iter().any(|x| !x.is_finite())).map(|(n, _)| n))
    }
}

/// Evaluates the ten rubrics and ranks tickers by their total.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Create an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default())
    }

    /// Create an engine with custom configuration.
    #[must_use]
    pub const fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn gather(
        &self,
        quote: &Quote,
        record: &FinancialRecord,
    ) -> Result<Inputs, ExtractionError> {
        let quarterly = &record.quarterly;
        let annual = &record.annual;
        let (quarters, years) = (self.config.trailing_quarters, self.config.trend_years);

        Ok(Inputs {
            per: quote.per,
            pbr: quote.pbr,
            price: quote.close,
            market_cap: quote.market_cap,
            shares: quote.shares_outstanding,
            debt: quarterly.latest(LineItem::Liabilities)?,
            equity: quarterly.latest(LineItem::Equity)?,
            assets: quarterly.latest(LineItem::Assets)?,
            current_assets: quarterly.latest(LineItem::CurrentAssets)?,
            current_liabilities: quarterly.latest(LineItem::CurrentLiabilities)?,
            trailing_revenue: quarterly.trailing_sum(LineItem::Revenue, quarters)?,
            trailing_net_profit: quarterly.trailing_sum(LineItem::NetProfit, quarters)?,
            trailing_investing_cash_flow: quarterly
                .trailing_sum(LineItem::InvestingCashFlow, quarters)?,
            operating_profits: annual.recent(LineItem::OperatingProfit, years)?,
            annual_debt: annual.recent(LineItem::Liabilities, years)?,
            annual_equity: annual.recent(LineItem::Equity, years)?,
            annual_net_profits: annual.recent(LineItem::NetProfit, years)?,
        })
    }

    /// Score a single ticker.
    ///
    /// # Errors
    /// Fails if the ticker has no quote, a statement figure is missing, an
    /// input is not finite, or a rubric divides by zero.
    pub fn score_ticker(
        &self,
        ctx: &ScoringContext,
        ticker: &Ticker,
        record: &FinancialRecord,
    ) -> Result<ScoreVector, ScoringError> {
        let quote = ctx.quote(ticker).ok_or_else(|| ScoringError::MissingQuote(ticker.clone()))?;
        let inputs = self.gather(quote, record)?;
        if let Some(name) = inputs.non_finite() {
            return Err(ScoringError::NonFiniteInput(name));
        }

        let metric = |metric: MetricName, score: Result<f64, MetricError>| {
            score.map_err(|source| ScoringError::Metric { metric, source })
        };

        let mut scores = [0.0; MetricName::COUNT];
        scores[MetricName::Pbr.index()] = pbr_score(inputs.pbr);
        scores[MetricName::Per.index()] = per_score(inputs.per);
        scores[MetricName::DebtRatio.index()] =
            metric(MetricName::DebtRatio, debt_ratio_score(inputs.debt, inputs.equity))?;
        scores[MetricName::Roa.index()] =
            metric(MetricName::Roa, roa_score(inputs.trailing_net_profit, inputs.assets))?;
        scores[MetricName::Prr.index()] =
            prr_score(inputs.market_cap, inputs.trailing_investing_cash_flow);
        scores[MetricName::CashFlow.index()] = metric(
            MetricName::CashFlow,
            current_ratio_score(inputs.current_assets, inputs.current_liabilities),
        )?;
        scores[MetricName::Psr.index()] = metric(
            MetricName::Psr,
            psr_score(inputs.price, inputs.trailing_revenue, inputs.shares),
        )?;
        scores[MetricName::IncreasingProfit.index()] =
            metric(MetricName::IncreasingProfit, increasing_profit_score(&inputs.operating_profits))?;
        scores[MetricName::DecreasingDebt.index()] = metric(
            MetricName::DecreasingDebt,
            decreasing_debt_score(&inputs.annual_debt, &inputs.annual_equity),
        )?;
        scores[MetricName::PositiveProfit.index()] =
            metric(MetricName::PositiveProfit, positive_profit_score(&inputs.annual_net_profits))?;

        let vector = ScoreVector::new(scores);
        if let Some((name, _)) = vector.iter().find(|(_, s)| !s.is_finite()) {
            return Err(ScoringError::NonFiniteScore(name));
        }
        Ok(vector)
    }

    /// Score every ticker of the context's universe against the cache.
    ///
    /// Rows are ranked by unrounded total, highest first, and rounded
    /// afterwards; ties keep universe order.
    #[must_use]
    pub fn score_universe(&self, ctx: &ScoringContext, cache: &FinancialCache) -> ScoreBoard {
        let mut board = ScoreBoard::default();

        for ticker in ctx.universe() {
            let scored = cache
                .record(ticker)
                .ok_or_else(|| ScoringError::from(ExtractionError::MissingTicker(ticker.clone())))
                .and_then(|record| self.score_ticker(ctx, ticker, record));

            match scored {
                Ok(scores) => board.rows.push(ScoreRow {
                    ticker: ticker.clone(),
                    name: ctx.quote(ticker).map(|q| q.name.clone()).unwrap_or_default(),
                    scores,
                }),
                Err(reason) => {
                    debug!(ticker = %ticker, reason = %reason, "skipping ticker");
                    board.skipped.push(SkippedTicker { ticker: ticker.clone(), reason });
                }
            }
        }

        board.rows.sort_by(|a, b| b.scores.total().total_cmp(&a.scores.total()));
        for row in &mut board.rows {
            row.scores = row.scores.rounded(self.config.decimals);
        }

        info!(
            universe = ctx.universe().len(),
            scored = board.rows.len(),
            skipped = board.skipped.len(),
            "scored universe"
        );
        board
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use valuescore_primitives::{Market, Period, PeriodIndex, StatementSnapshot};

    use super::*;

    fn snapshot(periods: &[(i32, u32)], rows: &[(LineItem, &[f64])]) -> StatementSnapshot {
        let index =
            PeriodIndex::new(periods.iter().map(|(y, m)| Period::new(*y, *m).unwrap()).collect())
                .unwrap();
        let mut snapshot = StatementSnapshot::new(index);
        for (item, values) in rows {
            snapshot.insert(*item, values.iter().copied().map(Some).collect()).unwrap();
        }
        snapshot
    }

    /// A record that earns full marks on every statement rubric.
    fn record(operating_profits: &[f64]) -> FinancialRecord {
        let quarters = [(2024, 3), (2024, 6), (2024, 9), (2024, 12)];
        let years = [(2021, 12), (2022, 12), (2023, 12)];
        FinancialRecord {
            quarterly: snapshot(
                &quarters,
                &[
                    (LineItem::Revenue, &[250.0; 4]),
                    (LineItem::NetProfit, &[20.0; 4]),
                    (LineItem::Assets, &[400.0; 4]),
                    (LineItem::Liabilities, &[100.0; 4]),
                    (LineItem::Equity, &[100.0; 4]),
                    (LineItem::CurrentAssets, &[150.0; 4]),
                    (LineItem::CurrentLiabilities, &[100.0; 4]),
                    (LineItem::InvestingCashFlow, &[-25.0; 4]),
                ],
            ),
            annual: snapshot(
                &years,
                &[
                    (LineItem::OperatingProfit, operating_profits),
                    (LineItem::NetProfit, &[50.0, 60.0, 70.0]),
                    (LineItem::Liabilities, &[300.0, 200.0, 100.0]),
                    (LineItem::Equity, &[100.0, 100.0, 100.0]),
                ],
            ),
        }
    }

    fn quote(name: &str, market_cap: f64, per: f64) -> Quote {
        Quote {
            name: name.to_string(),
            market: Market::Kospi,
            close: 10_000.0,
            market_cap,
            shares_outstanding: 10_000_000.0,
            per,
            pbr: 1.0,
        }
    }

    fn context(quotes: &[(&str, Quote)]) -> ScoringContext {
        let mut snapshot = MarketSnapshot::new(Date::from_ymd_opt(2025, 1, 2).unwrap());
        for (ticker, quote) in quotes {
            snapshot.insert(Ticker::new(*ticker), quote.clone());
        }
        ScoringContext::new(snapshot, ScoringContext::DEFAULT_MIN_MARKET_CAP)
    }

    #[test]
    fn full_marks() {
        let ctx = context(&[("005930", quote("삼성전자", 1000.0, 10.0))]);
        let ticker = Ticker::new("005930");
        let scores = ScoringEngine::new().score_ticker(&ctx, &ticker, &record(&[100.0, 200.0, 300.0])).unwrap();

        for (metric, score) in scores.iter() {
            assert_eq!(score, 10.0, "{metric}");
        }
        assert_relative_eq!(scores.total(), 100.0);
    }

    #[test]
    fn annual_trend_runs_oldest_to_newest() {
        let ctx = context(&[("005930", quote("삼성전자", 1000.0, 10.0))]);
        let ticker = Ticker::new("005930");
        let engine = ScoringEngine::new();

        // newest first this reads 300, 200, 100
        let growing = engine.score_ticker(&ctx, &ticker, &record(&[100.0, 200.0, 300.0])).unwrap();
        assert_eq!(growing.get(MetricName::IncreasingProfit), 10.0);

        let shrinking = engine.score_ticker(&ctx, &ticker, &record(&[300.0, 200.0, 100.0])).unwrap();
        assert_eq!(shrinking.get(MetricName::IncreasingProfit), 0.0);
    }

    #[test]
    fn missing_quote_is_an_error() {
        let ctx = context(&[]);
        let err = ScoringEngine::new()
            .score_ticker(&ctx, &Ticker::new("005930"), &record(&[1.0, 2.0, 3.0]))
            .unwrap_err();
        assert_eq!(err, ScoringError::MissingQuote(Ticker::new("005930")));
    }

    #[test]
    fn degenerate_division_is_an_error() {
        let ctx = context(&[("005930", quote("삼성전자", 1000.0, 10.0))]);
        let mut record = record(&[1.0, 2.0, 3.0]);
        record.quarterly.insert(LineItem::Equity, vec![Some(1.0), Some(1.0), Some(1.0), Some(0.0)]).unwrap();

        let err = ScoringEngine::new().score_ticker(&ctx, &Ticker::new("005930"), &record).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Metric {
                metric: MetricName::DebtRatio,
                source: MetricError::DivisionByZero("equity"),
            }
        );
    }

    #[test]
    fn missing_and_non_finite_inputs_are_errors() {
        let ctx = context(&[("005930", quote("삼성전자", 1000.0, f64::NAN))]);
        let ticker = Ticker::new("005930");
        let engine = ScoringEngine::new();

        let err = engine.score_ticker(&ctx, &ticker, &record(&[1.0, 2.0, 3.0])).unwrap_err();
        assert_eq!(err, ScoringError::NonFiniteInput("PER"));

        let ctx = context(&[("005930", quote("삼성전자", 1000.0, 10.0))]);
        let mut record = record(&[1.0, 2.0, 3.0]);
        record.quarterly.insert(LineItem::Revenue, vec![Some(1.0), None, Some(1.0), Some(1.0)]).unwrap();
        let err = engine.score_ticker(&ctx, &ticker, &record).unwrap_err();
        assert!(matches!(err, ScoringError::Extraction(ExtractionError::MissingValue { .. })));
    }

    #[test]
    fn universe_is_ranked_with_skips() {
        let ctx = context(&[
            ("000001", quote("Tie A", 1000.0, 60.0)),
            ("000002", quote("Best", 1000.0, 10.0)),
            ("000003", quote("Tie B", 1000.0, 60.0)),
            ("000004", quote("Uncached", 5000.0, 10.0)),
            ("000005", quote("Too small", 999.9, 10.0)),
        ]);
        let cache: FinancialCache = ["000001", "000002", "000003", "000005"]
            .into_iter()
            .map(|t| (Ticker::new(t), record(&[100.0, 200.0, 300.0])))
            .collect();

        let board = ScoringEngine::new().score_universe(&ctx, &cache);

        assert_eq!(ctx.universe().len(), 4);
        assert_eq!(
            board.tickers().map(Ticker::as_str).collect::<Vec<_>>(),
            vec!["000002", "000001", "000003"]
        );
        assert_eq!(board.rows()[0].name, "Best");
        assert_relative_eq!(board.rows()[1].scores.total(), 90.0);
        assert_eq!(board.top(1).len(), 1);
        assert_eq!(board.top(10).len(), 3);

        assert_eq!(board.skipped().len(), 1);
        assert_eq!(
            board.skipped()[0].reason,
            ScoringError::Extraction(ExtractionError::MissingTicker(Ticker::new("000004")))
        );
    }

    #[test]
    fn scores_are_rounded() {
        // PER 20 scores 14 - 80/15 = 8.6666..
        let ctx = context(&[("005930", quote("삼성전자", 1000.0, 20.0))]);
        let cache: FinancialCache =
            [(Ticker::new("005930"), record(&[100.0, 200.0, 300.0]))].into_iter().collect();

        let board = ScoringEngine::new().score_universe(&ctx, &cache);
        let scores = board.rows()[0].scores;
        assert_eq!(scores.get(MetricName::Per), 8.667);
        assert_eq!(scores.total(), 98.667);
    }

    #[test]
    fn ranking_uses_unrounded_totals() {
        // both totals round to 98.667
        let ctx = context(&[
            ("000001", quote("Slightly worse", 1000.0, 20.0001)),
            ("000002", quote("Slightly better", 1000.0, 20.0)),
        ]);
        let cache: FinancialCache = ["000001", "000002"]
            .into_iter()
            .map(|t| (Ticker::new(t), record(&[100.0, 200.0, 300.0])))
            .collect();

        let board = ScoringEngine::new().score_universe(&ctx, &cache);

        assert_eq!(
            board.tickers().map(Ticker::as_str).collect::<Vec<_>>(),
            vec!["000002", "000001"]
        );
        assert_eq!(board.rows()[0].scores.total(), 98.667);
        assert_eq!(board.rows()[1].scores.total(), 98.667);
    }
}
