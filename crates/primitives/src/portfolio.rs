//! Price history and portfolio allocation types.

use std::collections::BTreeMap;

use crate::{Date, Listing};

/// Daily closing prices keyed by trading day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    closes: BTreeMap<Date, f64>,
}

impl PriceSeries {
    /// Create an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self { closes: BTreeMap::new() }
    }

    /// Add or replace a close.
    pub fn insert(&mut self, date: Date, close: f64) {
        self.closes.insert(date, close);
    }

    /// Number of closes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Close on a given day.
    #[must_use]
    pub fn get(&self, date: &Date) -> Option<f64> {
        self.closes.get(date).copied()
    }

    /// Trading days, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = &Date> {
        self.closes.keys()
    }

    /// Closes, oldest first.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.closes.values().copied().collect()
    }

    /// Most recent `(date, close)`.
    #[must_use]
    pub fn last(&self) -> Option<(Date, f64)> {
        self.closes.last_key_value().map(|(d, c)| (*d, *c))
    }
}

impl FromIterator<(Date, f64)> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = (Date, f64)>>(iter: I) -> Self {
        Self { closes: iter.into_iter().collect() }
    }
}

/// Horizon-scaled return, volatility and their ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetStats {
    /// Standard deviation of daily returns scaled by the square root of the horizon.
    pub volatility: f64,
    /// Mean daily return scaled by the horizon.
    pub expected_return: f64,
    /// Return over volatility (no risk-free rate).
    pub sharpe: f64,
}

/// Share allocation for one basket member.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Listing of the allocated ticker.
    pub listing: Listing,
    /// Risk/return statistics of the ticker.
    pub stats: AssetStats,
    /// Sharpe-proportional weight; may be negative.
    pub weight: f64,
    /// Latest close.
    pub price: f64,
    /// Rounded share count; negative counts are implied short positions.
    pub shares: i64,
    /// `shares * price`.
    pub cash: f64,
}

/// Allocation table with portfolio-level and benchmark statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReport {
    /// One row per basket member, in input order.
    pub allocations: Vec<Allocation>,
    /// Statistics of the allocated portfolio.
    pub portfolio: AssetStats,
    /// Statistics of the benchmark index.
    pub benchmark: AssetStats,
}

impl PortfolioReport {
    /// Sum of allocated cash.
    #[must_use]
    pub fn invested(&self) -> f64 {
        self.allocations.iter().map(|a| a.cash).sum()
    }
}
