//! Rubric functions mapping raw financial figures to bounded scores.
//!
//! Linear rubrics are clamped to `[0, MAX_SCORE]`; binary rubrics return
//! either `0` or `MAX_SCORE`. Rubrics that divide by a statement figure
//! return [`MetricError::DivisionByZero`] instead of a score when that figure
//! is zero, except [`prr_score`] which scores zero.

use crate::MetricError;

/// Full score of a single rubric.
pub const MAX_SCORE: f64 = 10.0;

/// Statement figures are published in hundred-million KRW (억원).
pub const REVENUE_UNIT: f64 = 1e8;

/// Number of periods the trend rubrics look at.
const TREND_PERIODS: usize = 3;

/// Clamp a linear score into `[0, MAX_SCORE]`. NaN passes through.
#[must_use]
pub const fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, MAX_SCORE)
}

const fn binary(pass: bool) -> f64 {
    if pass { MAX_SCORE } else { 0.0 }
}

fn ratio(numerator: f64, denominator: f64, name: &'static str) -> Result<f64, MetricError> {
    if denominator == 0.0 {
        return Err(MetricError::DivisionByZero(name));
    }
    Ok(numerator / denominator)
}

fn first_three(values: &[f64]) -> Result<[f64; TREND_PERIODS], MetricError> {
    match values {
        [a, b, c, ..] => Ok([*a, *b, *c]),
        _ => Err(MetricError::InsufficientPeriods { required: TREND_PERIODS, actual: values.len() }),
    }
}

/// PER rubric: `14 - 4 * per / 15`.
///
/// Full score at PER 15 or below (including the degenerate non-positive
/// ratios), zero at 52.5 and above.
#[must_use]
pub const fn per_score(per: f64) -> f64 {
    clamp_score(14.0 - 4.0 * per / 15.0)
}

/// PBR rubric: `14 - 4 * pbr / 1.5`.
///
/// Full score at PBR 1.5 or below, zero at 5.25 and above.
#[must_use]
pub const fn pbr_score(pbr: f64) -> f64 {
    clamp_score(14.0 - 4.0 * pbr / 1.5)
}

/// Debt ratio rubric: `debt / equity` stepped at 100%, 175% and 250%.
///
/// # Errors
/// [`MetricError::DivisionByZero`] when equity is zero.
pub fn debt_ratio_score(debt: f64, equity: f64) -> Result<f64, MetricError> {
    let ratio = ratio(debt, equity, "equity")?;
    let score = if ratio <= 1.0 {
        10.0
    } else if ratio <= 1.75 {
        7.0
    } else if ratio <= 2.5 {
        4.0
    } else {
        0.0
    };
    Ok(score)
}

/// ROA rubric: `10 - 50 * (0.20 - net_profit / assets)`.
///
/// The caller passes trailing-four-quarter net profit, so the ratio is an
/// annual figure. Full score at 20% and above, zero at 0% and below.
///
/// # Errors
/// [`MetricError::DivisionByZero`] when assets are zero.
pub fn roa_score(net_profit: f64, assets: f64) -> Result<f64, MetricError> {
    let roa = ratio(net_profit, assets, "assets")?;
    Ok(clamp_score(10.0 - 50.0 * (0.2 - roa)))
}

/// PRR rubric: full score iff `0 < -market_cap / investing_cash_flow <= 15`.
///
/// Investing cash flow is normally negative, so a healthy ratio is positive.
/// Zero cash flow scores zero.
#[must_use]
pub fn prr_score(market_cap: f64, investing_cash_flow: f64) -> f64 {
    if investing_cash_flow == 0.0 {
        return 0.0;
    }
    let prr = -market_cap / investing_cash_flow;
    binary(prr > 0.0 && prr <= 15.0)
}

/// Profit growth rubric: full score iff the first three values, in the
/// order given, are strictly increasing.
///
/// # Errors
/// [`MetricError::InsufficientPeriods`] with fewer than three values.
pub fn increasing_profit_score(profits: &[f64]) -> Result<f64, MetricError> {
    let [a, b, c] = first_three(profits)?;
    Ok(binary(a < b && b < c))
}

/// Deleveraging rubric: full score iff the first three `debt / equity`
/// ratios, in the order given, are strictly decreasing.
///
/// # Errors
/// [`MetricError::InsufficientPeriods`] with fewer than three periods on
/// either side, [`MetricError::DivisionByZero`] when an equity value is zero.
pub fn decreasing_debt_score(debt: &[f64], equity: &[f64]) -> Result<f64, MetricError> {
    let debt = first_three(debt)?;
    let equity = first_three(equity)?;
    let mut ratios = [0.0; TREND_PERIODS];
    for i in 0..TREND_PERIODS {
        ratios[i] = ratio(debt[i], equity[i], "equity")?;
    }
    let [a, b, c] = ratios;
    Ok(binary(a > b && b > c))
}

/// Profitability rubric: full score iff the first three net profits are all
/// strictly positive.
///
/// # Errors
/// [`MetricError::InsufficientPeriods`] with fewer than three values.
pub fn positive_profit_score(net_profits: &[f64]) -> Result<f64, MetricError> {
    let values = first_three(net_profits)?;
    Ok(binary(values.iter().all(|v| *v > 0.0)))
}

/// Current ratio rubric: full score iff `current_assets / current_liabilities >= 1`.
///
/// # Errors
/// [`MetricError::DivisionByZero`] when current liabilities are zero.
pub fn current_ratio_score(current_assets: f64, current_liabilities: f64) -> Result<f64, MetricError> {
    let ratio = ratio(current_assets, current_liabilities, "current liabilities")?;
    Ok(binary(ratio >= 1.0))
}

/// PSR rubric: full score iff `price / revenue_per_share <= 1`.
///
/// `revenue_per_share = trailing_revenue * REVENUE_UNIT / shares`, with
/// `trailing_revenue` the sum of the last four quarters in statement units.
///
/// # Errors
/// [`MetricError::DivisionByZero`] when shares or revenue are zero.
pub fn psr_score(price: f64, trailing_revenue: f64, shares: f64) -> Result<f64, MetricError> {
    let revenue_per_share = ratio(trailing_revenue * REVENUE_UNIT, shares, "shares outstanding")?;
    let psr = ratio(price, revenue_per_share, "revenue")?;
    Ok(binary(psr <= 1.0))
}
