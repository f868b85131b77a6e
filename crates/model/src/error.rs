//! Error types for scoring and portfolio construction.

use valuescore_math::{MathError, MetricError};
use valuescore_primitives::{ExtractionError, MetricName, Ticker};
use valuescore_traits::SourceError;

/// Reasons a ticker cannot be scored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// Ticker has no quote in the market snapshot.
    #[error("no market quote for {0}")]
    MissingQuote(Ticker),

    /// Statement figures are missing or malformed.
    #[error("statement data: {0}")]
    Extraction(#[from] ExtractionError),

    /// A scoring input is NaN or infinite.
    #[error("non-finite input: {0}")]
    NonFiniteInput(&'static str),

    /// A rubric could not be evaluated.
    #[error("{metric}: {source}")]
    Metric {
        /// Rubric that failed.
        metric: MetricName,
        /// Underlying error.
        source: MetricError,
    },

    /// A rubric produced a NaN or infinite score.
    #[error("non-finite score for {0}")]
    NonFiniteScore(MetricName),
}

/// Errors that can occur during portfolio construction.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Price history source failure.
    #[error("price source error: {0}")]
    Source(#[from] SourceError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Basket has no members.
    #[error("empty basket")]
    EmptyBasket,

    /// Not enough common trading days to compute returns.
    #[error("insufficient price history: need {required} common days, have {actual}")]
    InsufficientHistory {
        /// Days required.
        required: usize,
        /// Common days available.
        actual: usize,
    },

    /// Latest close is not a positive number.
    #[error("invalid price for {ticker}: {price}")]
    InvalidPrice {
        /// Affected ticker.
        ticker: Ticker,
        /// Offending price.
        price: f64,
    },

    /// Sharpe proxies sum to zero or a non-finite value.
    ///
    /// Reported as an error instead of carrying NaN weights into the
    /// allocation table.
    #[error("sharpe proxies sum to {0}, weights are undefined")]
    DegenerateWeights(f64),

    /// Rounded share counts sum to zero.
    ///
    /// Reported as an error instead of a NaN share-weighted return.
    #[error("allocation rounds to zero shares in total")]
    ZeroShares,
}

impl ModelError {
    /// Returns whether this error is specific to the chosen basket rather
    /// than the data source.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Source(_))
    }
}
