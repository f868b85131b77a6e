//! Market quote type definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Date, Listing, Market, Ticker};

/// End-of-day market data for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Company display name.
    pub name: String,
    /// Market segment.
    pub market: Market,
    /// Closing price (KRW).
    pub close: f64,
    /// Market capitalization in hundred-million KRW (억원).
    pub market_cap: f64,
    /// Listed shares outstanding.
    pub shares_outstanding: f64,
    /// Price-to-earnings ratio; 0 when the exchange publishes none.
    pub per: f64,
    /// Price-to-book ratio; 0 when the exchange publishes none.
    pub pbr: f64,
}

/// Market-wide quotes for a single trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Trading day the quotes refer to.
    pub date: Date,
    quotes: BTreeMap<Ticker, Quote>,
}

impl MarketSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self { date, quotes: BTreeMap::new() }
    }

    /// Add or replace a quote.
    pub fn insert(&mut self, ticker: Ticker, quote: Quote) {
        self.quotes.insert(ticker, quote);
    }

    /// Quote of a ticker.
    #[must_use]
    pub fn get(&self, ticker: &Ticker) -> Option<&Quote> {
        self.quotes.get(ticker)
    }

    /// Listing (ticker, market, name) of a ticker.
    #[must_use]
    pub fn listing(&self, ticker: &Ticker) -> Option<Listing> {
        self.quotes.get(ticker).map(|q| Listing::new(ticker.clone(), q.market, q.name.clone()))
    }

    /// Iterate quotes in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, &Quote)> {
        self.quotes.iter()
    }

    /// Number of quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Tickers whose market cap is at least `min_market_cap` (억원), in ticker order.
    #[must_use]
    pub fn universe(&self, min_market_cap: f64) -> Vec<Ticker> {
        self.quotes
            .iter()
            .filter(|(_, q)| q.market_cap >= min_market_cap)
            .map(|(t, _)| t.clone())
            .collect()
    }
}
