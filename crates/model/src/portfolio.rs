//! Sharpe-proportional portfolio construction.

use std::collections::BTreeSet;

use chrono::TimeDelta;
use ndarray::{Array1, Array2};
use tracing::{debug, info};
use valuescore_math::{covariance_matrix, horizon_stats, pct_change, quadratic_form};
use valuescore_primitives::{Allocation, AssetStats, Date, Listing, PortfolioReport, PriceSeries};
use valuescore_traits::PriceHistory;

use crate::ModelError;

/// Configuration for portfolio construction.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Trading days the daily statistics are scaled to.
    pub horizon: f64,
    /// Calendar days of price history fetched for a basket.
    pub lookback_days: i64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self { horizon: 90.0, lookback_days: 1095 }
    }
}

/// Close histories of the basket members and the benchmark.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    /// Basket members with their closes, in selection order.
    pub members: Vec<(Listing, PriceSeries)>,
    /// Benchmark index closes.
    pub benchmark: PriceSeries,
}

/// Fetch `lookback_days` of closes ending at `as_of` for every listing and
/// the benchmark.
///
/// # Errors
/// Fails on the first source error.
pub async fn fetch_basket<H: PriceHistory>(
    history: &H,
    listings: &[Listing],
    as_of: Date,
    lookback_days: i64,
) -> Result<Basket, ModelError> {
    let start = as_of - TimeDelta::days(lookback_days);
    let mut members = Vec::with_capacity(listings.len());
    for listing in listings {
        let closes = history.daily_closes(listing, start, as_of).await?;
        debug!(ticker = %listing.ticker, closes = closes.len(), "fetched price history");
        members.push((listing.clone(), closes));
    }
    let benchmark = history.benchmark_closes(start, as_of).await?;
    Ok(Basket { members, benchmark })
}

/// Weights proportional to the Sharpe proxies.
///
/// Negative proxies produce negative weights.
fn sharpe_weights(sharpes: &[f64]) -> Result<Array1<f64>, ModelError> {
    let total: f64 = sharpes.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(ModelError::DegenerateWeights(total));
    }
    Ok(sharpes.iter().map(|s| s / total).collect())
}

/// Whole shares bought with `weight * budget`, ties to even.
fn share_count(weight: f64, budget: f64, price: f64) -> i64 {
    (weight * budget / price).round_ties_even() as i64
}

/// Builds share allocations for a budget from a basket's close history.
#[derive(Debug, Clone, Default)]
pub struct PortfolioConstructor {
    config: PortfolioConfig,
}

impl PortfolioConstructor {
    /// Create a constructor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PortfolioConfig::default())
    }

    /// Create a constructor with custom configuration.
    #[must_use]
    pub const fn with_config(config: PortfolioConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    /// Allocate `budget` across the basket.
    ///
    /// Member closes are aligned on the trading days common to every member.
    ///
    /// # Errors
    /// Fails if the basket is empty, has fewer than three common days, has a
    /// non-positive latest close, if the Sharpe proxies sum to zero, or if
    /// every share count rounds to zero.
    pub fn construct(&self, basket: &Basket, budget: f64) -> Result<PortfolioReport, ModelError> {
        let horizon = self.config.horizon;
        let Some((_, first)) = basket.members.first() else {
            return Err(ModelError::EmptyBasket);
        };

        let mut dates: BTreeSet<Date> = first.dates().copied().collect();
        for (_, series) in &basket.members[1..] {
            dates.retain(|d| series.get(d).is_some());
        }
        if dates.len() < 3 {
            return Err(ModelError::InsufficientHistory { required: 3, actual: dates.len() });
        }

        let n_obs = dates.len() - 1;
        let n_assets = basket.members.len();
        let mut returns = Array2::zeros((n_obs, n_assets));
        let mut prices = Vec::with_capacity(n_assets);
        let mut stats = Vec::with_capacity(n_assets);

        for (j, (listing, series)) in basket.members.iter().enumerate() {
            let closes: Vec<f64> = dates.iter().filter_map(|d| series.get(d)).collect();
            let price = closes.last().copied().unwrap_or_default();
            if !(price > 0.0 && price.is_finite()) {
                return Err(ModelError::InvalidPrice { ticker: listing.ticker.clone(), price });
            }
            let column = pct_change(&closes);
            stats.push(horizon_stats(column.view(), horizon)?);
            returns.column_mut(j).assign(&column);
            prices.push(price);
        }

        let weights = sharpe_weights(&stats.iter().map(|s| s.sharpe).collect::<Vec<_>>())?;

        let allocations: Vec<Allocation> = basket
            .members
            .iter()
            .zip(stats)
            .zip(weights.iter().zip(prices))
            .map(|(((listing, _), stats), (&weight, price))| {
                let shares = share_count(weight, budget, price);
                Allocation {
                    listing: listing.clone(),
                    stats,
                    weight,
                    price,
                    shares,
                    cash: shares as f64 * price,
                }
            })
            .collect();

        let total_shares: i64 = allocations.iter().map(|a| a.shares).sum();
        if total_shares == 0 {
            return Err(ModelError::ZeroShares);
        }
        let expected_return = allocations
            .iter()
            .map(|a| a.stats.expected_return * a.shares as f64)
            .sum::<f64>()
            / total_shares as f64;
        let cov = covariance_matrix(&returns)?;
        let volatility = (quadratic_form(&weights, &cov)? * horizon).sqrt();
        let portfolio = AssetStats { volatility, expected_return, sharpe: expected_return / volatility };

        let benchmark = horizon_stats(pct_change(&basket.benchmark.closes()).view(), horizon)?;

        info!(
            members = allocations.len(),
            common_days = dates.len(),
            sharpe = portfolio.sharpe,
            "constructed portfolio"
        );
        Ok(PortfolioReport { allocations, portfolio, benchmark })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;
    use valuescore_primitives::{Market, Ticker};
    use valuescore_traits::SourceError;

    use super::*;

    fn day(offset: i64) -> Date {
        Date::from_ymd_opt(2024, 1, 1).unwrap() + TimeDelta::days(offset)
    }

    fn series(closes: &[f64]) -> PriceSeries {
        closes.iter().enumerate().map(|(i, c)| (day(i as i64), *c)).collect()
    }

    fn listing(ticker: &str) -> Listing {
        Listing::new(ticker, Market::Kospi, ticker)
    }

    fn basket() -> Basket {
        Basket {
            members: vec![
                (listing("A"), series(&[100.0, 101.0, 103.0, 102.0, 105.0, 107.0])),
                (listing("B"), series(&[50.0, 50.5, 50.0, 51.0, 51.5, 52.0])),
            ],
            benchmark: series(&[2500.0, 2510.0, 2490.0, 2520.0, 2530.0, 2540.0]),
        }
    }

    #[test]
    fn weights_follow_sharpe() {
        let weights = sharpe_weights(&[2.0, -0.5]).unwrap();
        assert_relative_eq!(weights[0], 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(weights[1], -1.0 / 3.0, epsilon = 1e-12);
        assert!(share_count(weights[1], 1_000_000.0, 10_000.0) < 0);
    }

    #[test]
    fn zero_sharpe_sum_is_degenerate() {
        assert!(matches!(sharpe_weights(&[1.0, -1.0]), Err(ModelError::DegenerateWeights(_))));
    }

    #[rstest]
    #[case(0.5, 1000.0, 100.0, 5)]
    #[case(0.25, 1000.0, 100.0, 2)] // 2.5 rounds to even
    #[case(0.5, 700.0, 100.0, 4)] // 3.5 rounds to even
    #[case(-0.25, 1000.0, 100.0, -2)]
    fn shares_round_half_to_even(
        #[case] weight: f64,
        #[case] budget: f64,
        #[case] price: f64,
        #[case] expected: i64,
    ) {
        assert_eq!(share_count(weight, budget, price), expected);
    }

    #[test]
    fn construct_allocates_budget() {
        let report = PortfolioConstructor::new().construct(&basket(), 10_000_000.0).unwrap();

        assert_eq!(report.allocations.len(), 2);
        let weight_sum: f64 = report.allocations.iter().map(|a| a.weight).sum();
        assert_relative_eq!(weight_sum, 1.0, epsilon = 1e-12);

        for allocation in &report.allocations {
            assert_relative_eq!(allocation.cash, allocation.shares as f64 * allocation.price);
            assert_relative_eq!(
                allocation.stats.sharpe,
                allocation.stats.expected_return / allocation.stats.volatility,
                epsilon = 1e-12
            );
        }
        assert_eq!(report.allocations[0].price, 107.0);
        assert_eq!(report.allocations[1].price, 52.0);
        assert!(report.invested() > 0.0);
        assert!(report.portfolio.volatility > 0.0);
        assert!(report.benchmark.expected_return > 0.0);
    }

    #[test]
    fn declining_member_is_shorted() {
        let mut basket = basket();
        basket.members[1].1 = series(&[50.0, 51.0, 49.5, 50.5, 49.0, 49.5]);
        let report = PortfolioConstructor::new().construct(&basket, 10_000_000.0).unwrap();

        let (rising, falling) = (&report.allocations[0], &report.allocations[1]);
        assert!(falling.stats.sharpe < 0.0);
        assert!(falling.weight < 0.0);
        assert!(rising.weight > 1.0);
        assert!(falling.shares < 0);
        assert!(falling.cash < 0.0);
        assert!(rising.shares > 0);
        let weight_sum: f64 = report.allocations.iter().map(|a| a.weight).sum();
        assert_relative_eq!(weight_sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn flat_member_makes_weights_degenerate() {
        let mut basket = basket();
        basket.members[1].1 = series(&[50.0; 6]);
        let err = PortfolioConstructor::new().construct(&basket, 10_000_000.0).unwrap_err();
        assert!(matches!(err, ModelError::DegenerateWeights(total) if total.is_nan()));
    }

    #[test]
    fn single_member_portfolio_matches_member() {
        let mut basket = basket();
        basket.members.truncate(1);
        let report = PortfolioConstructor::new().construct(&basket, 1_000_000.0).unwrap();

        let member = report.allocations[0].stats;
        assert_eq!(report.allocations[0].weight, 1.0);
        assert_relative_eq!(report.portfolio.expected_return, member.expected_return, epsilon = 1e-12);
        assert_relative_eq!(report.portfolio.volatility, member.volatility, epsilon = 1e-12);
    }

    #[test]
    fn members_are_aligned_on_common_days() {
        let mut basket = basket();
        // B misses the last day, so A's latest common close is 105
        basket.members[1].1 = series(&[50.0, 50.5, 50.0, 51.0, 51.5]);
        let report = PortfolioConstructor::new().construct(&basket, 1_000_000.0).unwrap();
        assert_eq!(report.allocations[0].price, 105.0);
    }

    #[test]
    fn construct_rejects_bad_baskets() {
        let constructor = PortfolioConstructor::new();
        assert!(matches!(constructor.construct(&Basket::default(), 1.0), Err(ModelError::EmptyBasket)));

        let mut short = basket();
        short.members[0].1 = series(&[100.0, 101.0]);
        assert!(matches!(
            constructor.construct(&short, 1.0),
            Err(ModelError::InsufficientHistory { required: 3, actual: 2 })
        ));

        let mut zero = basket();
        zero.members[0].1 = series(&[100.0, 101.0, 103.0, 102.0, 105.0, 0.0]);
        assert!(matches!(constructor.construct(&zero, 1.0), Err(ModelError::InvalidPrice { .. })));

        assert!(matches!(constructor.construct(&basket(), 1.0), Err(ModelError::ZeroShares)));
    }

    struct FixedHistory;

    impl PriceHistory for FixedHistory {
        async fn daily_closes(
            &self,
            listing: &Listing,
            _start: Date,
            _end: Date,
        ) -> Result<PriceSeries, SourceError> {
            match listing.ticker.as_str() {
                "A" => Ok(series(&[1.0, 2.0, 3.0])),
                other => Err(SourceError::NoData(other.to_string())),
            }
        }

        async fn benchmark_closes(&self, start: Date, end: Date) -> Result<PriceSeries, SourceError> {
            Ok([(start, 1.0), (end, 2.0)].into_iter().collect())
        }
    }

    #[tokio::test]
    async fn fetch_basket_spans_lookback() {
        let as_of = day(1095);
        let basket = fetch_basket(&FixedHistory, &[listing("A")], as_of, 1095).await.unwrap();
        assert_eq!(basket.members.len(), 1);
        assert_eq!(basket.members[0].0.ticker, Ticker::new("A"));
        assert_eq!(basket.benchmark.dates().next(), Some(&day(0)));

        let err = fetch_basket(&FixedHistory, &[listing("A"), listing("B")], as_of, 1095).await.unwrap_err();
        assert!(matches!(err, ModelError::Source(SourceError::NoData(_))));
    }
}
