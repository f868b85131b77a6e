//! Score vector type definitions.

use derive_more::Display;

/// The ten rubric metrics, in display column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum MetricName {
    /// Price-to-book ratio rubric.
    #[display("PBR")]
    Pbr,
    /// Price-to-earnings ratio rubric.
    #[display("PER")]
    Per,
    /// Latest-quarter debt ratio rubric.
    #[display("Debt ratio")]
    DebtRatio,
    /// Trailing return-on-assets rubric.
    #[display("ROA over20")]
    Roa,
    /// Market cap over investing cash flow rubric.
    #[display("PRR under15")]
    Prr,
    /// Current ratio rubric.
    #[display("Cash flow")]
    CashFlow,
    /// Price-to-sales ratio rubric.
    #[display("PSR under1")]
    Psr,
    /// Three-year operating profit growth rubric.
    #[display("3y Increase Profit")]
    IncreasingProfit,
    /// Three-year debt ratio decline rubric.
    #[display("3y Decrease Debt")]
    DecreasingDebt,
    /// Three-year positive net profit rubric.
    #[display("3y Positive Profit")]
    PositiveProfit,
}

impl MetricName {
    /// Number of metrics.
    pub const COUNT: usize = 10;

    /// Every metric in column order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Pbr,
        Self::Per,
        Self::DebtRatio,
        Self::Roa,
        Self::Prr,
        Self::CashFlow,
        Self::Psr,
        Self::IncreasingProfit,
        Self::DecreasingDebt,
        Self::PositiveProfit,
    ];

    /// Column position of the metric.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Per-ticker rubric scores and their total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreVector {
    scores: [f64; MetricName::COUNT],
    total: f64,
}

impl ScoreVector {
    /// Create a score vector; the total is the sum of all metric scores.
    #[must_use]
    pub fn new(scores: [f64; MetricName::COUNT]) -> Self {
        Self { scores, total: scores.iter().sum() }
    }

    /// Score of one metric.
    #[must_use]
    pub const fn get(&self, metric: MetricName) -> f64 {
        self.scores[metric.index()]
    }

    /// Sum of the metric scores.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Metric scores in column order.
    #[must_use]
    pub const fn scores(&self) -> &[f64; MetricName::COUNT] {
        &self.scores
    }

    /// Iterate `(metric, score)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        MetricName::ALL.into_iter().zip(self.scores.iter().copied())
    }

    /// Whether every score and the total are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.total.is_finite() && self.scores.iter().all(|s| s.is_finite())
    }

    /// Copy with every score and the total rounded to `decimals` places.
    ///
    /// The total is rounded from the unrounded sum. Ties round to even.
    #[must_use]
    pub fn rounded(&self, decimals: u32) -> Self {
        let scale = 10_f64.powi(decimals as i32);
        let round = |v: f64| (v * scale).round_ties_even() / scale;
        Self { scores: self.scores.map(round), total: round(self.total) }
    }
}
