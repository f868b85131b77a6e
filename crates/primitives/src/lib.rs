#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuescore-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod ticker;
pub use ticker::{Listing, Market, Ticker};

mod period;
pub use period::{Period, PeriodIndex};

mod statement;
pub use statement::{FinancialRecord, LineItem, StatementRow, StatementSnapshot, StatementTable};

mod quote;
pub use quote::{MarketSnapshot, Quote};

mod scores;
pub use scores::{MetricName, ScoreVector};

mod portfolio;
pub use portfolio::{Allocation, AssetStats, PortfolioReport, PriceSeries};

mod error;
pub use error::ExtractionError;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
