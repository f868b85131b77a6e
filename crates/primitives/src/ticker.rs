//! Ticker and listing type definitions.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Exchange ticker code (six digits on KRX, e.g. `005930`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ticker(pub String);

impl Ticker {
    /// Create a new ticker.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Market segment a ticker is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Market {
    /// KOSPI main board.
    #[display("KOSPI")]
    Kospi,
    /// KOSDAQ board.
    #[display("KOSDAQ")]
    Kosdaq,
}

/// A ticker together with its market and human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Ticker code.
    pub ticker: Ticker,
    /// Market segment.
    pub market: Market,
    /// Company display name.
    pub name: String,
}

impl Listing {
    /// Create a new listing.
    #[must_use]
    pub fn new(ticker: impl Into<Ticker>, market: Market, name: impl Into<String>) -> Self {
        Self { ticker: ticker.into(), market, name: name.into() }
    }
}
