//! Daily return statistics.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use valuescore_primitives::AssetStats;

use crate::MathError;

/// Simple returns `p[t] / p[t-1] - 1` of a close series.
///
/// The result has one element fewer than the input.
#[must_use]
pub fn pct_change(closes: &[f64]) -> Array1<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Sample standard deviation (`ddof = 1`). NaN with fewer than two values.
#[must_use]
pub fn sample_std(values: ArrayView1<'_, f64>) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = values.sum() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

/// Horizon-scaled statistics of a daily return series.
///
/// `volatility = std * sqrt(horizon)`, `expected_return = mean * horizon`,
/// `sharpe = expected_return / volatility`.
///
/// # Errors
/// [`MathError::InsufficientData`] with fewer than two returns.
pub fn horizon_stats(returns: ArrayView1<'_, f64>, horizon: f64) -> Result<AssetStats, MathError> {
    if returns.len() < 2 {
        return Err(MathError::InsufficientData { required: 2, actual: returns.len() });
    }
    let mean = returns.sum() / returns.len() as f64;
    let volatility = sample_std(returns) * horizon.sqrt();
    let expected_return = mean * horizon;
    Ok(AssetStats { volatility, expected_return, sharpe: expected_return / volatility })
}

/// Sample covariance matrix (`ddof = 1`) of a return panel.
///
/// # Arguments
/// * `returns` - Observations in rows, assets in columns
///
/// # Errors
/// [`MathError::InsufficientData`] with fewer than two observations.
pub fn covariance_matrix(returns: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    let n = returns.nrows();
    let means = match returns.mean_axis(Axis(0)) {
        Some(means) if n >= 2 => means,
        _ => return Err(MathError::InsufficientData { required: 2, actual: n }),
    };
    let centered = returns - &means.insert_axis(Axis(0));
    Ok(centered.t().dot(&centered) / (n - 1) as f64)
}

/// Quadratic form `wᵀ M w`.
///
/// # Errors
/// [`MathError::DimensionMismatch`] unless `matrix` is square with the
/// length of `weights`.
pub fn quadratic_form(weights: &Array1<f64>, matrix: &Array2<f64>) -> Result<f64, MathError> {
    let n = weights.len();
    for actual in [matrix.nrows(), matrix.ncols()] {
        if actual != n {
            return Err(MathError::DimensionMismatch { expected: n, actual });
        }
    }
    Ok(weights.dot(&matrix.dot(weights)))
}
