//! Error types for statement extraction.

use crate::{LineItem, Period, Ticker};

/// Errors raised while turning provider statements into typed figures.
///
/// Every variant means "this ticker cannot be scored"; callers skip the
/// ticker and record the reason.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    /// Header label is not a `YYYY/MM` period.
    #[error("invalid period label: {0:?}")]
    InvalidPeriod(String),

    /// The same period appears twice in one table.
    #[error("duplicate period: {0}")]
    DuplicatePeriod(Period),

    /// Statement table at the given section index is absent.
    #[error("statement table {0} not found")]
    MissingTable(usize),

    /// Row-label column heading is neither consolidated nor separate IFRS.
    #[error("unrecognised statement table heading: {0:?}")]
    UnknownHeading(String),

    /// Table has no period columns.
    #[error("statement table {0} has no period columns")]
    NoPeriods(usize),

    /// Line item row is absent.
    #[error("missing line item: {0}")]
    MissingItem(LineItem),

    /// Line item has no value for a required period.
    #[error("missing value for {item} at {period}")]
    MissingValue {
        /// Line item.
        item: LineItem,
        /// Period without a value.
        period: Period,
    },

    /// Not enough periods for a trailing window.
    #[error("need {required} periods, have {actual}")]
    InsufficientPeriods {
        /// Periods required.
        required: usize,
        /// Periods available.
        actual: usize,
    },

    /// Row length does not match the period index.
    #[error("{item} has {actual} values for {expected} periods")]
    LengthMismatch {
        /// Line item.
        item: LineItem,
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        actual: usize,
    },

    /// Ticker is absent from the statement cache.
    #[error("no cached statements for {0}")]
    MissingTicker(Ticker),
}
