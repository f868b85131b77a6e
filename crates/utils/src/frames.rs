//! Score and allocation tables.

use polars::prelude::*;
use valuescore_model::ScoreRow;
use valuescore_primitives::{Allocation, MetricName, PortfolioReport};

use crate::UtilsError;

/// Ticker column name.
pub const TICKER_COLUMN: &str = "Ticker";

/// Display name column name.
pub const NAME_COLUMN: &str = "Name";

/// Total score column name.
pub const TOTAL_COLUMN: &str = "Score";

/// Ranked score table: ticker, name, one column per metric, and the total.
///
/// Row order is preserved.
///
/// # Errors
/// Returns a polars error if the frame cannot be assembled.
pub fn score_frame(rows: &[ScoreRow]) -> Result<DataFrame, UtilsError> {
    let mut columns = Vec::with_capacity(MetricName::COUNT + 3);
    columns.push(Column::new(
        TICKER_COLUMN.into(),
        rows.iter().map(|r| r.ticker.to_string()).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(NAME_COLUMN.into(), rows.iter().map(|r| r.name.clone()).collect::<Vec<_>>()));
    for metric in MetricName::ALL {
        columns.push(Column::new(
            metric.to_string().into(),
            rows.iter().map(|r| r.scores.get(metric)).collect::<Vec<_>>(),
        ));
    }
    columns.push(Column::new(
        TOTAL_COLUMN.into(),
        rows.iter().map(|r| r.scores.total()).collect::<Vec<_>>(),
    ));
    Ok(DataFrame::new(columns)?)
}

/// Allocation table, one row per basket member keyed by display name.
///
/// # Errors
/// Returns a polars error if the frame cannot be assembled.
pub fn allocation_frame(report: &PortfolioReport) -> Result<DataFrame, UtilsError> {
    let rows = &report.allocations;
    let float = |name: &str, pick: fn(&Allocation) -> f64| {
        Column::new(name.into(), rows.iter().map(pick).collect::<Vec<_>>())
    };
    Ok(DataFrame::new(vec![
        Column::new(NAME_COLUMN.into(), rows.iter().map(|a| a.listing.name.clone()).collect::<Vec<_>>()),
        Column::new(
            TICKER_COLUMN.into(),
            rows.iter().map(|a| a.listing.ticker.to_string()).collect::<Vec<_>>(),
        ),
        float("Volatility", |a| a.stats.volatility),
        float("Return", |a| a.stats.expected_return),
        float("Sharpe", |a| a.stats.sharpe),
        float("Weight", |a| a.weight),
        float("Price", |a| a.price),
        Column::new("Shares".into(), rows.iter().map(|a| a.shares).collect::<Vec<_>>()),
        float("Cash", |a| a.cash),
    ])?)
}
