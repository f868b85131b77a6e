//! Describe-style summary of the score table.

use polars::prelude::*;
use valuescore_primitives::MetricName;

use crate::{TOTAL_COLUMN, UtilsError};

/// Statistic labels, in summary row order.
pub const SUMMARY_STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

fn statistic(label: &str, expr: Expr) -> Expr {
    match label {
        "count" => expr.count().cast(DataType::Float64),
        "mean" => expr.mean(),
        "std" => expr.std(1),
        "min" => expr.min(),
        "25%" => expr.quantile(lit(0.25), QuantileMethod::Linear),
        "50%" => expr.quantile(lit(0.5), QuantileMethod::Linear),
        "75%" => expr.quantile(lit(0.75), QuantileMethod::Linear),
        _ => expr.max(),
    }
}

/// Count, mean, sample std, min, quartiles and max of every metric column
/// and the total of a [`crate::score_frame`].
///
/// # Errors
/// Returns a polars error if a metric column is missing.
pub fn score_summary(frame: &DataFrame) -> Result<DataFrame, UtilsError> {
    let columns: Vec<String> = MetricName::ALL
        .iter()
        .map(ToString::to_string)
        .chain(std::iter::once(TOTAL_COLUMN.to_string()))
        .collect();

    let mut stats: Option<DataFrame> = None;
    for label in SUMMARY_STATISTICS {
        let row = frame
            .clone()
            .lazy()
            .select(
                columns
                    .iter()
                    .map(|c| statistic(label, col(c.as_str()).cast(DataType::Float64)).alias(c.as_str()))
                    .collect::<Vec<_>>(),
            )
            .collect()?;
        match stats.as_mut() {
            Some(df) => {
                df.vstack_mut(&row)?;
            }
            None => stats = Some(row),
        }
    }

    let labels = Column::new("statistic".into(), SUMMARY_STATISTICS.to_vec());
    let stats = stats.unwrap_or_default();
    Ok(DataFrame::new(vec![labels])?.hstack(stats.get_columns())?)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use valuescore_model::ScoreRow;
    use valuescore_primitives::{ScoreVector, Ticker};

    use super::*;
    use crate::score_frame;

    fn rows(pers: &[f64]) -> Vec<ScoreRow> {
        pers.iter()
            .enumerate()
            .map(|(i, per)| {
                let mut scores = [0.0; MetricName::COUNT];
                scores[MetricName::Per.index()] = *per;
                ScoreRow { ticker: Ticker::new(format!("{i:06}")), name: String::new(), scores: ScoreVector::new(scores) }
            })
            .collect()
    }

    #[test]
    fn summary_matches_describe() {
        let frame = score_frame(&rows(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        let summary = score_summary(&frame).unwrap();

        assert_eq!(summary.height(), SUMMARY_STATISTICS.len());
        let per = summary.column("PER").unwrap().f64().unwrap();
        assert_relative_eq!(per.get(0).unwrap(), 4.0);
        assert_relative_eq!(per.get(1).unwrap(), 2.5);
        assert_relative_eq!(per.get(2).unwrap(), (5.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(per.get(3).unwrap(), 1.0);
        assert_relative_eq!(per.get(4).unwrap(), 1.75);
        assert_relative_eq!(per.get(5).unwrap(), 2.5);
        assert_relative_eq!(per.get(6).unwrap(), 3.25);
        assert_relative_eq!(per.get(7).unwrap(), 4.0);

        let labels = summary.column("statistic").unwrap().str().unwrap();
        assert_eq!(labels.get(4), Some("25%"));
    }

    #[test]
    fn missing_column_is_an_error() {
        let frame = df! { "PER" => &[1.0] }.unwrap();
        assert!(score_summary(&frame).is_err());
    }
}
