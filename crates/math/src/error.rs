//! Error types for rubric and statistics operations.

/// Errors that can occur while evaluating a rubric.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    /// A ratio denominator was zero.
    #[error("division by zero: {0} is zero")]
    DivisionByZero(&'static str),

    /// Too few periods for a trend rubric.
    #[error("insufficient periods: need {required}, got {actual}")]
    InsufficientPeriods {
        /// Periods required.
        required: usize,
        /// Periods supplied.
        actual: usize,
    },
}

/// Errors that can occur during return statistics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Too few observations for a sample statistic.
    #[error("insufficient observations: need {required}, got {actual}")]
    InsufficientData {
        /// Observations required.
        required: usize,
        /// Observations supplied.
        actual: usize,
    },
}
