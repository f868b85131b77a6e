#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuescore-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod rubric;
pub use rubric::{
    MAX_SCORE, REVENUE_UNIT, clamp_score, current_ratio_score, debt_ratio_score,
    decreasing_debt_score, increasing_profit_score, pbr_score, per_score, positive_profit_score,
    prr_score, psr_score, roa_score,
};

mod returns;
pub use returns::{covariance_matrix, horizon_stats, pct_change, quadratic_form, sample_std};

mod error;
pub use error::{MathError, MetricError};
