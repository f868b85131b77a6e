#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuescore-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod frames;
pub use frames::{NAME_COLUMN, TICKER_COLUMN, TOTAL_COLUMN, allocation_frame, score_frame};

mod summary;
pub use summary::{SUMMARY_STATISTICS, score_summary};

mod export;
pub use export::{results_file_name, write_csv};

mod error;
pub use error::UtilsError;
