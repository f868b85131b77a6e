//! # valuescore
//!
//! Value-investing scoring and portfolio construction for KOSPI and KOSDAQ
//! equities.
//!
//! This crate provides a unified interface to the valuescore workspace.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `traits`: Data source abstractions
//! - `math`: Metric rubrics and return statistics
//! - `model`: Scoring engine and portfolio constructor
//! - `cache`: Statement extraction and the JSON cache
//! - `sources`: KRX, FnGuide and Yahoo Finance adapters
//! - `utils`: Polars tables and CSV export
//! - `cli`: The `valuescore` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use valuescore::cache::FinancialCache;
//! use valuescore::model::{ScoringContext, ScoringEngine};
//!
//! let cache = FinancialCache::load("data")?;
//! let board = ScoringEngine::new().score_universe(&ctx, &cache);
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuescore-rs/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use valuescore_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use valuescore_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use valuescore_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use valuescore_model as model;
#[cfg(feature = "cache")]
#[doc(inline)]
pub use valuescore_cache as cache;
#[cfg(feature = "sources")]
#[doc(inline)]
pub use valuescore_sources as sources;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use valuescore_utils as utils;
