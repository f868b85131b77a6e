#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuescore-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod extract;
pub use extract::{ANNUAL_SECTIONS, QUARTERLY_SECTIONS, Section, extract_snapshots};

mod store;
pub use store::{ANNUAL_FILE, FinancialCache, QUARTERLY_FILE};

mod builder;
pub use builder::{CacheBuild, CacheBuilder, CacheConfig, SkippedFetch};

mod error;
pub use error::CacheError;
