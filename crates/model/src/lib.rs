#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuescore-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod scoring;
pub use scoring::{
    ScoreBoard, ScoreRow, ScoringConfig, ScoringContext, ScoringEngine, SkippedTicker,
};

mod portfolio;
pub use portfolio::{Basket, PortfolioConfig, PortfolioConstructor, fetch_basket};

mod error;
pub use error::{ModelError, ScoringError};

/// Re-export commonly used types.
pub mod prelude {
    pub use valuescore_traits::{MarketDataSource, PriceHistory, StatementSource};

    pub use super::{PortfolioConstructor, ScoringContext, ScoringEngine};
}
